use crate::{
    entities::{room, room_status, room_type, transaction},
    errors::ServiceError,
    services::inventory::{InventoryService, InventorySummary},
};
use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Room status name counted as free in the dashboard summary.
const AVAILABLE_ROOM_STATUS: &str = "Available";

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct StatusCount {
    pub status_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct DashboardRoom {
    pub room_id: i32,
    pub room_number: String,
    pub status_name: String,
    pub type_name: String,
    #[serde(serialize_with = "crate::entities::serialize_money")]
    #[schema(value_type = String, example = "1500.00")]
    pub base_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomsOverview {
    pub total_rooms: u64,
    pub status_counts: Vec<StatusCount>,
    pub room_list: Vec<DashboardRoom>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_rooms: u64,
    pub available_rooms: u64,
    pub check_ins: u64,
    pub check_outs: u64,
    pub inventory: InventorySummary,
}

/// Numeric part of a room number, skipping its one-character prefix.
///
/// `"R101"` sorts as 101, `"A7"` as 7. Leading digits are read until the
/// first non-digit; a number with none sorts as 0.
pub fn room_number_sort_key(room_number: &str) -> u64 {
    room_number
        .chars()
        .skip(1)
        .take_while(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(chrono::NaiveTime::MIN);
    let end = day
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(chrono::NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DatabaseConnection>,
    inventory: InventoryService,
    room_list_limit: usize,
}

impl DashboardService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        inventory: InventoryService,
        room_list_limit: usize,
    ) -> Self {
        Self {
            db,
            inventory,
            room_list_limit,
        }
    }

    #[instrument(skip(self))]
    pub async fn rooms(&self) -> Result<RoomsOverview, ServiceError> {
        let db = &*self.db;

        let total_rooms = room::Entity::find().count(db).await?;

        let status_counts = room::Entity::find()
            .select_only()
            .column_as(room_status::Column::StatusName, "status_name")
            .column_as(
                Expr::col((room::Entity, room::Column::RoomId)).count(),
                "count",
            )
            .join(JoinType::InnerJoin, room::Relation::RoomStatus.def())
            .group_by(room_status::Column::StatusId)
            .group_by(room_status::Column::StatusName)
            .order_by_asc(room_status::Column::StatusId)
            .into_model::<StatusCount>()
            .all(db)
            .await?;

        let mut room_list = room::Entity::find()
            .select_only()
            .column(room::Column::RoomId)
            .column(room::Column::RoomNumber)
            .column_as(room_status::Column::StatusName, "status_name")
            .column_as(room_type::Column::TypeName, "type_name")
            .column_as(room_type::Column::BaseRate, "base_rate")
            .join(JoinType::InnerJoin, room::Relation::RoomStatus.def())
            .join(JoinType::InnerJoin, room::Relation::RoomType.def())
            .order_by_asc(room::Column::RoomId)
            .into_model::<DashboardRoom>()
            .all(db)
            .await?;

        // The numeric sort key has no portable SQL form (a Postgres CAST
        // fails on non-digit suffixes), so the whole room set is loaded and
        // ordered here before the limit applies. Stable sort keeps room_id
        // order among equal keys.
        room_list.sort_by_key(|r| room_number_sort_key(&r.room_number));
        room_list.truncate(self.room_list_limit);

        Ok(RoomsOverview {
            total_rooms,
            status_counts,
            room_list,
        })
    }

    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<DashboardSummary, ServiceError> {
        let db = &*self.db;
        let (day_start, day_end) = day_bounds(Utc::now().date_naive());

        let total_rooms = room::Entity::find().count(db).await?;
        let available_rooms = room::Entity::find()
            .join(JoinType::InnerJoin, room::Relation::RoomStatus.def())
            .filter(room_status::Column::StatusName.eq(AVAILABLE_ROOM_STATUS))
            .count(db)
            .await?;
        let check_ins = transaction::Entity::find()
            .filter(transaction::Column::Checkin.gte(day_start))
            .filter(transaction::Column::Checkin.lt(day_end))
            .count(db)
            .await?;
        let check_outs = transaction::Entity::find()
            .filter(transaction::Column::Checkout.gte(day_start))
            .filter(transaction::Column::Checkout.lt(day_end))
            .count(db)
            .await?;

        let inventory = self.inventory.summary().await?;

        Ok(DashboardSummary {
            total_rooms,
            available_rooms,
            check_ins,
            check_outs,
            inventory,
        })
    }
}
