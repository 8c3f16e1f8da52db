use crate::{
    db::next_id,
    entities::{guest, inventory_item, room, sales_detail, transaction},
    errors::{DbResultExt, ServiceError},
    services::inventory::{resolve_status_id, StockStatus, ITEM_NOT_FOUND},
};
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

pub const TRANSACTION_NOT_FOUND: &str = "Transaction not found";
pub const DUPLICATE_TRANSACTION: &str = "Transaction already exists";
pub const UNKNOWN_STAY_REFERENCE: &str = "guest_id or room_id does not exist";
pub const TRANSACTION_IN_USE: &str = "Cannot delete: transaction has sales records";
pub const CHECKOUT_BEFORE_CHECKIN: &str = "checkout cannot be before checkin";
pub const INSUFFICIENT_STOCK: &str = "Insufficient stock";
pub const DUPLICATE_SALE: &str = "Sale already exists";
pub const UNKNOWN_SALE_REFERENCE: &str = "trans_id or inv_id does not exist";

/// Stay with guest name and room number resolved.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct TransactionView {
    pub trans_id: i32,
    pub guest_id: i32,
    pub guest_name: String,
    pub room_id: i32,
    pub room_number: String,
    #[schema(value_type = String, example = "2025-01-25T14:00:00")]
    pub checkin: NaiveDateTime,
    #[schema(value_type = Option<String>)]
    pub checkout: Option<NaiveDateTime>,
    #[serde(serialize_with = "crate::entities::serialize_money")]
    #[schema(value_type = String, example = "4500.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub date_created: chrono::NaiveDate,
}

#[derive(Debug, Clone, FromQueryResult)]
struct SaleJoined {
    sale_id: i32,
    inv_id: i32,
    name: String,
    quantity: i32,
    unit_cost: Decimal,
}

/// One sold line of a stay.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleLine {
    pub sale_id: i32,
    pub inv_id: i32,
    pub name: String,
    pub quantity: i32,
    #[serde(serialize_with = "crate::entities::serialize_money")]
    #[schema(value_type = String, example = "35.00")]
    pub unit_cost: Decimal,
    #[serde(serialize_with = "crate::entities::serialize_money")]
    #[schema(value_type = String, example = "70.00")]
    pub line_total: Decimal,
}

impl From<SaleJoined> for SaleLine {
    fn from(row: SaleJoined) -> Self {
        Self {
            line_total: row.unit_cost * Decimal::from(row.quantity),
            sale_id: row.sale_id,
            inv_id: row.inv_id,
            name: row.name,
            quantity: row.quantity,
            unit_cost: row.unit_cost,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub guest_id: i32,
    pub room_id: i32,
    pub checkin: NaiveDateTime,
    pub checkout: Option<NaiveDateTime>,
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct SaleInput {
    pub inv_id: i32,
    pub quantity: i32,
    pub unit_cost: Decimal,
}

#[derive(Clone)]
pub struct TransactionService {
    db: Arc<DatabaseConnection>,
    low_stock_threshold: i32,
}

impl TransactionService {
    pub fn new(db: Arc<DatabaseConnection>, low_stock_threshold: i32) -> Self {
        Self {
            db,
            low_stock_threshold,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TransactionView>, ServiceError> {
        let stays = transaction::Entity::find()
            .select_only()
            .column(transaction::Column::TransId)
            .column(transaction::Column::GuestId)
            .column_as(guest::Column::Name, "guest_name")
            .column(transaction::Column::RoomId)
            .column_as(room::Column::RoomNumber, "room_number")
            .column(transaction::Column::Checkin)
            .column(transaction::Column::Checkout)
            .column(transaction::Column::Amount)
            .column(transaction::Column::DateCreated)
            .join(JoinType::InnerJoin, transaction::Relation::Guest.def())
            .join(JoinType::InnerJoin, transaction::Relation::Room.def())
            .order_by_desc(transaction::Column::TransId)
            .into_model::<TransactionView>()
            .all(&*self.db)
            .await?;

        Ok(stays)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: TransactionInput) -> Result<i32, ServiceError> {
        if matches!(input.checkout, Some(checkout) if checkout < input.checkin) {
            return Err(ServiceError::ValidationError(
                CHECKOUT_BEFORE_CHECKIN.to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let trans_id =
            next_id::<transaction::Entity, _>(&txn, transaction::Column::TransId).await?;

        let model = transaction::ActiveModel {
            trans_id: Set(trans_id),
            guest_id: Set(input.guest_id),
            room_id: Set(input.room_id),
            checkin: Set(input.checkin),
            checkout: Set(input.checkout),
            amount: Set(input.amount),
            date_created: Set(Utc::now().date_naive()),
        };
        transaction::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_insert_err(
                transaction::Column::TransId,
                DUPLICATE_TRANSACTION,
                UNKNOWN_STAY_REFERENCE,
            )?;

        txn.commit().await?;

        info!(trans_id, room_id = input.room_id, "Transaction created");
        Ok(trans_id)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, trans_id: i32) -> Result<u64, ServiceError> {
        let result = transaction::Entity::delete_by_id(trans_id)
            .exec(&*self.db)
            .await
            .map_delete_err(TRANSACTION_IN_USE)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        }

        info!(trans_id, "Transaction deleted");
        Ok(result.rows_affected)
    }

    #[instrument(skip(self))]
    pub async fn sales(&self, trans_id: i32) -> Result<Vec<SaleLine>, ServiceError> {
        let db = &*self.db;

        if transaction::Entity::find_by_id(trans_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        }

        let rows = sales_detail::Entity::find()
            .select_only()
            .column(sales_detail::Column::SaleId)
            .column(sales_detail::Column::InvId)
            .column_as(inventory_item::Column::Name, "name")
            .column(sales_detail::Column::Quantity)
            .column(sales_detail::Column::UnitCost)
            .join(JoinType::InnerJoin, sales_detail::Relation::Item.def())
            .filter(sales_detail::Column::TransId.eq(trans_id))
            .order_by_asc(sales_detail::Column::SaleId)
            .into_model::<SaleJoined>()
            .all(db)
            .await?;

        Ok(rows.into_iter().map(SaleLine::from).collect())
    }

    /// Records a sale against a stay and takes the sold quantity out of
    /// stock. The stock check, decrement, status refresh and insert commit
    /// together or not at all.
    #[instrument(skip(self))]
    pub async fn add_sale(&self, trans_id: i32, input: SaleInput) -> Result<i32, ServiceError> {
        let txn = self.db.begin().await?;

        if transaction::Entity::find_by_id(trans_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        }

        if inventory_item::Entity::find_by_id(input.inv_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(ITEM_NOT_FOUND.to_string()));
        }

        // stock check and decrement are one statement; its row lock
        // serializes concurrent sales of the same item
        let decremented = inventory_item::Entity::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).sub(input.quantity),
            )
            .filter(inventory_item::Column::InvId.eq(input.inv_id))
            .filter(inventory_item::Column::Quantity.gte(input.quantity))
            .exec(&txn)
            .await?;
        if decremented.rows_affected == 0 {
            warn!(
                inv_id = input.inv_id,
                requested = input.quantity,
                "Sale rejected for insufficient stock"
            );
            return Err(ServiceError::InsufficientStock(INSUFFICIENT_STOCK.to_string()));
        }

        let remaining = inventory_item::Entity::find_by_id(input.inv_id)
            .one(&txn)
            .await?
            .map(|item| item.quantity)
            .ok_or_else(|| ServiceError::NotFound(ITEM_NOT_FOUND.to_string()))?;
        let status = StockStatus::from_quantity(remaining, self.low_stock_threshold);
        let invstat_id = resolve_status_id(&txn, status).await?;

        inventory_item::Entity::update_many()
            .col_expr(inventory_item::Column::InvstatId, Expr::value(invstat_id))
            .filter(inventory_item::Column::InvId.eq(input.inv_id))
            .exec(&txn)
            .await?;

        let sale_id = next_id::<sales_detail::Entity, _>(&txn, sales_detail::Column::SaleId).await?;
        let sale = sales_detail::ActiveModel {
            sale_id: Set(sale_id),
            trans_id: Set(trans_id),
            inv_id: Set(input.inv_id),
            quantity: Set(input.quantity),
            unit_cost: Set(input.unit_cost),
        };
        sales_detail::Entity::insert(sale)
            .exec_without_returning(&txn)
            .await
            .map_insert_err(
                sales_detail::Column::SaleId,
                DUPLICATE_SALE,
                UNKNOWN_SALE_REFERENCE,
            )?;

        txn.commit().await?;

        info!(sale_id, trans_id, inv_id = input.inv_id, remaining, "Sale recorded");
        Ok(sale_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_is_quantity_times_unit_cost() {
        let line = SaleLine::from(SaleJoined {
            sale_id: 1,
            inv_id: 4,
            name: "Bottled Water".to_string(),
            quantity: 3,
            unit_cost: dec!(25.50),
        });
        assert_eq!(line.line_total, dec!(76.50));

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["line_total"], "76.50");
        assert_eq!(json["unit_cost"], "25.50");
    }
}
