use crate::{
    db::next_id,
    entities::{inventory_category, inventory_item, inventory_status, inventory_type},
    errors::{DbResultExt, ServiceError},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set, TransactionTrait,
};
use serde::Serialize;
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const DUPLICATE_ITEM: &str = "Inventory item already exists";
pub const UNKNOWN_ITEM_LOOKUP: &str = "category_id or inv_type_id does not exist";
pub const ITEM_IN_USE: &str =
    "Cannot delete: inventory item is used in other records (sales/purchased/damages).";

/// Stock level an item is in, derived from its quantity alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum StockStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// `0` is out of stock, anything below `threshold` is low.
    pub fn from_quantity(quantity: i32, threshold: i32) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < threshold {
            StockStatus::LowStock
        } else {
            StockStatus::Available
        }
    }

    /// Name as stored in the `inventory_status` lookup table.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Available => "Available",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up the `inventory_status` row for a derived status.
///
/// The lookup rows are seeded by migration; a missing row is a broken
/// deployment, not a client error.
pub async fn resolve_status_id<C>(conn: &C, status: StockStatus) -> Result<i32, ServiceError>
where
    C: ConnectionTrait,
{
    inventory_status::Entity::find()
        .filter(inventory_status::Column::InvstatName.eq(status.as_str()))
        .one(conn)
        .await?
        .map(|row| row.invstat_id)
        .ok_or_else(|| {
            warn!(status = %status, "inventory_status lookup row missing");
            ServiceError::InternalError(format!("inventory status '{status}' is not seeded"))
        })
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct CategoryOption {
    pub category_id: i32,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct TypeOption {
    pub inv_type_id: i32,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct StatusOption {
    pub invstat_id: i32,
    pub invstat_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryLookups {
    pub categories: Vec<CategoryOption>,
    pub types: Vec<TypeOption>,
    pub statuses: Vec<StatusOption>,
}

/// Counts per stock level, used by the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_items: u64,
    pub available_count: u64,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
    pub threshold: i32,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct LowStockItem {
    pub inv_id: i32,
    pub name: String,
    pub quantity: i32,
    pub category_name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, FromQueryResult)]
struct InventoryJoined {
    inv_id: i32,
    name: String,
    quantity: i32,
    category_id: i32,
    category_name: String,
    inv_type_id: i32,
    type_name: String,
    invstat_id: i32,
}

/// Inventory item with category and type names and its derived status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryItemView {
    pub inv_id: i32,
    pub name: String,
    pub quantity: i32,
    pub category_id: i32,
    pub category_name: String,
    pub inv_type_id: i32,
    pub type_name: String,
    pub invstat_id: i32,
    pub invstat_name: StockStatus,
}

impl InventoryItemView {
    /// Both status fields come from the quantity; the stored `invstat_id`
    /// is only used when the lookup row for the derived status is missing.
    fn from_joined(
        row: InventoryJoined,
        threshold: i32,
        status_ids: &HashMap<String, i32>,
    ) -> Self {
        let status = StockStatus::from_quantity(row.quantity, threshold);
        Self {
            invstat_id: status_ids
                .get(status.as_str())
                .copied()
                .unwrap_or(row.invstat_id),
            invstat_name: status,
            inv_id: row.inv_id,
            name: row.name,
            quantity: row.quantity,
            category_id: row.category_id,
            category_name: row.category_name,
            inv_type_id: row.inv_type_id,
            type_name: row.type_name,
        }
    }
}

/// Validated inventory payload. A client-sent status is never part of it.
#[derive(Debug, Clone)]
pub struct InventoryInput {
    pub name: String,
    pub category_id: i32,
    pub inv_type_id: i32,
    pub quantity: i32,
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    low_stock_threshold: i32,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, low_stock_threshold: i32) -> Self {
        Self {
            db,
            low_stock_threshold,
        }
    }

    fn joined() -> Select<inventory_item::Entity> {
        inventory_item::Entity::find()
            .select_only()
            .column(inventory_item::Column::InvId)
            .column(inventory_item::Column::Name)
            .column(inventory_item::Column::Quantity)
            .column(inventory_item::Column::CategoryId)
            .column_as(inventory_category::Column::CategoryName, "category_name")
            .column(inventory_item::Column::InvTypeId)
            .column_as(inventory_type::Column::TypeName, "type_name")
            .column(inventory_item::Column::InvstatId)
            .join(JoinType::InnerJoin, inventory_item::Relation::Category.def())
            .join(JoinType::InnerJoin, inventory_item::Relation::Type.def())
    }

    async fn status_ids(&self) -> Result<HashMap<String, i32>, ServiceError> {
        let rows = inventory_status::Entity::find().all(&*self.db).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.invstat_name, row.invstat_id))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn lookups(&self) -> Result<InventoryLookups, ServiceError> {
        let db = &*self.db;

        let categories = inventory_category::Entity::find()
            .order_by_asc(inventory_category::Column::CategoryName)
            .into_model::<CategoryOption>()
            .all(db)
            .await?;
        let types = inventory_type::Entity::find()
            .order_by_asc(inventory_type::Column::TypeName)
            .into_model::<TypeOption>()
            .all(db)
            .await?;
        let statuses = inventory_status::Entity::find()
            .order_by_asc(inventory_status::Column::InvstatName)
            .into_model::<StatusOption>()
            .all(db)
            .await?;

        Ok(InventoryLookups {
            categories,
            types,
            statuses,
        })
    }

    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<InventorySummary, ServiceError> {
        let db = &*self.db;
        let threshold = self.low_stock_threshold;

        let total_items = inventory_item::Entity::find().count(db).await?;
        let available_count = inventory_item::Entity::find()
            .filter(inventory_item::Column::Quantity.gte(threshold))
            .count(db)
            .await?;
        let low_stock_count = inventory_item::Entity::find()
            .filter(inventory_item::Column::Quantity.gt(0))
            .filter(inventory_item::Column::Quantity.lt(threshold))
            .count(db)
            .await?;
        let out_of_stock_count = inventory_item::Entity::find()
            .filter(inventory_item::Column::Quantity.lte(0))
            .count(db)
            .await?;

        Ok(InventorySummary {
            total_items,
            available_count,
            low_stock_count,
            out_of_stock_count,
            threshold,
        })
    }

    /// Items that are in stock but under the threshold, scarcest first.
    #[instrument(skip(self))]
    pub async fn low_stock(&self, limit: u64) -> Result<Vec<LowStockItem>, ServiceError> {
        let items = inventory_item::Entity::find()
            .select_only()
            .column(inventory_item::Column::InvId)
            .column(inventory_item::Column::Name)
            .column(inventory_item::Column::Quantity)
            .column_as(inventory_category::Column::CategoryName, "category_name")
            .column_as(inventory_type::Column::TypeName, "type_name")
            .join(JoinType::InnerJoin, inventory_item::Relation::Category.def())
            .join(JoinType::InnerJoin, inventory_item::Relation::Type.def())
            .filter(inventory_item::Column::Quantity.gt(0))
            .filter(inventory_item::Column::Quantity.lt(self.low_stock_threshold))
            .order_by_asc(inventory_item::Column::Quantity)
            .order_by_asc(inventory_item::Column::InvId)
            .limit(limit)
            .into_model::<LowStockItem>()
            .all(&*self.db)
            .await?;

        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<InventoryItemView>, ServiceError> {
        let threshold = self.low_stock_threshold;
        let rows = Self::joined()
            .order_by_asc(inventory_item::Column::InvId)
            .into_model::<InventoryJoined>()
            .all(&*self.db)
            .await?;
        let status_ids = self.status_ids().await?;

        Ok(rows
            .into_iter()
            .map(|row| InventoryItemView::from_joined(row, threshold, &status_ids))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, inv_id: i32) -> Result<InventoryItemView, ServiceError> {
        let row = Self::joined()
            .filter(inventory_item::Column::InvId.eq(inv_id))
            .into_model::<InventoryJoined>()
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ITEM_NOT_FOUND.to_string()))?;
        let status_ids = self.status_ids().await?;

        Ok(InventoryItemView::from_joined(
            row,
            self.low_stock_threshold,
            &status_ids,
        ))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: InventoryInput) -> Result<i32, ServiceError> {
        let status = StockStatus::from_quantity(input.quantity, self.low_stock_threshold);

        let txn = self.db.begin().await?;

        let invstat_id = resolve_status_id(&txn, status).await?;
        let inv_id = next_id::<inventory_item::Entity, _>(&txn, inventory_item::Column::InvId)
            .await?;

        let model = inventory_item::ActiveModel {
            inv_id: Set(inv_id),
            name: Set(input.name),
            category_id: Set(input.category_id),
            inv_type_id: Set(input.inv_type_id),
            quantity: Set(input.quantity),
            invstat_id: Set(invstat_id),
        };
        inventory_item::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_insert_err(
                inventory_item::Column::InvId,
                DUPLICATE_ITEM,
                UNKNOWN_ITEM_LOOKUP,
            )?;

        txn.commit().await?;

        info!(inv_id, status = %status, "Inventory item created");
        Ok(inv_id)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, inv_id: i32, input: InventoryInput) -> Result<u64, ServiceError> {
        let status = StockStatus::from_quantity(input.quantity, self.low_stock_threshold);

        let txn = self.db.begin().await?;

        let existing = inventory_item::Entity::find_by_id(inv_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ITEM_NOT_FOUND.to_string()))?;
        let invstat_id = resolve_status_id(&txn, status).await?;

        let mut model: inventory_item::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.category_id = Set(input.category_id);
        model.inv_type_id = Set(input.inv_type_id);
        model.quantity = Set(input.quantity);
        model.invstat_id = Set(invstat_id);
        model
            .update(&txn)
            .await
            .map_write_err(DUPLICATE_ITEM, UNKNOWN_ITEM_LOOKUP)?;

        txn.commit().await?;

        info!(inv_id, status = %status, "Inventory item updated");
        Ok(1)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, inv_id: i32) -> Result<u64, ServiceError> {
        let result = inventory_item::Entity::delete_by_id(inv_id)
            .exec(&*self.db)
            .await
            .map_delete_err(ITEM_IN_USE)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(ITEM_NOT_FOUND.to_string()));
        }

        info!(inv_id, "Inventory item deleted");
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, StockStatus::OutOfStock)]
    #[case(1, StockStatus::LowStock)]
    #[case(99, StockStatus::LowStock)]
    #[case(100, StockStatus::Available)]
    #[case(5000, StockStatus::Available)]
    fn status_boundaries_at_default_threshold(#[case] quantity: i32, #[case] expected: StockStatus) {
        assert_eq!(StockStatus::from_quantity(quantity, 100), expected);
    }

    #[test]
    fn threshold_of_one_has_no_low_band() {
        assert_eq!(StockStatus::from_quantity(1, 1), StockStatus::Available);
        assert_eq!(StockStatus::from_quantity(0, 1), StockStatus::OutOfStock);
    }

    #[test]
    fn status_serializes_as_lookup_name() {
        assert_eq!(
            serde_json::to_value(StockStatus::LowStock).unwrap(),
            serde_json::json!("Low Stock")
        );
        assert_eq!(StockStatus::OutOfStock.to_string(), "Out of Stock");
    }
}
