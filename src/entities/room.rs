use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub room_id: i32,
    #[sea_orm(unique)]
    pub room_number: String,
    pub room_type_id: i32,
    pub status_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room_type::Entity",
        from = "Column::RoomTypeId",
        to = "super::room_type::Column::RoomTypeId"
    )]
    RoomType,
    #[sea_orm(
        belongs_to = "super::room_status::Entity",
        from = "Column::StatusId",
        to = "super::room_status::Column::StatusId"
    )]
    RoomStatus,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::room_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomType.def()
    }
}

impl Related<super::room_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomStatus.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
