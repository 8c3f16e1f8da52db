pub mod common;
pub mod dashboard;
pub mod guests;
pub mod health;
pub mod inventory;
pub mod rooms;
pub mod transactions;

use crate::{
    config::AppConfig,
    services::{
        dashboard::DashboardService, guests::GuestService, inventory::InventoryService,
        rooms::RoomService, transactions::TransactionService,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Container for all services used by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub rooms: Arc<RoomService>,
    pub inventory: Arc<InventoryService>,
    pub guests: Arc<GuestService>,
    pub dashboard: Arc<DashboardService>,
    pub transactions: Arc<TransactionService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let threshold = config.inventory_low_stock_threshold;
        let inventory = InventoryService::new(db.clone(), threshold);

        Self {
            rooms: Arc::new(RoomService::new(db.clone())),
            dashboard: Arc::new(DashboardService::new(
                db.clone(),
                inventory.clone(),
                config.dashboard_room_list_limit,
            )),
            inventory: Arc::new(inventory),
            guests: Arc::new(GuestService::new(db.clone())),
            transactions: Arc::new(TransactionService::new(db, threshold)),
        }
    }
}
