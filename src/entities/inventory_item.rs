use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub inv_id: i32,
    pub name: String,
    pub category_id: i32,
    pub inv_type_id: i32,
    pub quantity: i32,
    pub invstat_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_category::Entity",
        from = "Column::CategoryId",
        to = "super::inventory_category::Column::CategoryId"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::inventory_type::Entity",
        from = "Column::InvTypeId",
        to = "super::inventory_type::Column::InvTypeId"
    )]
    Type,
    #[sea_orm(
        belongs_to = "super::inventory_status::Entity",
        from = "Column::InvstatId",
        to = "super::inventory_status::Column::InvstatId"
    )]
    Status,
    #[sea_orm(has_many = "super::sales_detail::Entity")]
    Sales,
}

impl Related<super::inventory_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::inventory_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Type.def()
    }
}

impl Related<super::inventory_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::sales_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
