//! Business logic, one service per resource. Services own the database
//! transactions; handlers only validate and translate.

pub mod dashboard;
pub mod guests;
pub mod inventory;
pub mod rooms;
pub mod transactions;
