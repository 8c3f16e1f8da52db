use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock status lookup. Rows are seeded by migration and resolved by name,
/// never trusted from request payloads.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub invstat_id: i32,
    #[sea_orm(unique)]
    pub invstat_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_item::Entity")]
    Items,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
