use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub room_type_id: i32,
    #[sea_orm(unique)]
    pub type_name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_rate: Decimal,
    pub capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
