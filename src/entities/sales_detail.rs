use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One inventory line sold against a stay.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sale_id: i32,
    pub trans_id: i32,
    pub inv_id: i32,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_cost: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransId",
        to = "super::transaction::Column::TransId"
    )]
    Transaction,
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::InvId",
        to = "super::inventory_item::Column::InvId"
    )]
    Item,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
