use crate::{
    db::next_id,
    entities::{room, room_status, room_type},
    errors::{DbResultExt, ServiceError},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

pub const ROOM_NOT_FOUND: &str = "Room not found";
pub const DUPLICATE_ROOM_NUMBER: &str = "Room number already exists";
pub const UNKNOWN_ROOM_LOOKUP: &str = "room_type_id or status_id does not exist";
pub const ROOM_IN_USE: &str = "Cannot delete: room is used in transactions";

/// Room type option offered to the room form.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct RoomTypeOption {
    pub room_type_id: i32,
    pub type_name: String,
    #[serde(serialize_with = "crate::entities::serialize_money")]
    #[schema(value_type = String, example = "1500.00")]
    pub base_rate: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct RoomStatusOption {
    pub status_id: i32,
    pub status_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomLookups {
    #[serde(rename = "roomTypes")]
    pub room_types: Vec<RoomTypeOption>,
    #[serde(rename = "roomStatuses")]
    pub room_statuses: Vec<RoomStatusOption>,
}

/// Room joined with its type and status.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct RoomListing {
    pub room_id: i32,
    pub room_number: String,
    pub room_type_id: i32,
    pub type_name: String,
    #[serde(serialize_with = "crate::entities::serialize_money")]
    #[schema(value_type = String, example = "1500.00")]
    pub base_rate: Decimal,
    pub capacity: i32,
    pub status_id: i32,
    pub status_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomRecord {
    pub room_id: i32,
    pub room_number: String,
    pub room_type_id: i32,
    pub status_id: i32,
}

impl From<room::Model> for RoomRecord {
    fn from(model: room::Model) -> Self {
        Self {
            room_id: model.room_id,
            room_number: model.room_number,
            room_type_id: model.room_type_id,
            status_id: model.status_id,
        }
    }
}

/// Validated room payload.
#[derive(Debug, Clone)]
pub struct RoomInput {
    pub room_number: String,
    pub room_type_id: i32,
    pub status_id: i32,
}

#[derive(Clone)]
pub struct RoomService {
    db: Arc<DatabaseConnection>,
}

impl RoomService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn lookups(&self) -> Result<RoomLookups, ServiceError> {
        let db = &*self.db;

        let room_types = room_type::Entity::find()
            .order_by_asc(room_type::Column::TypeName)
            .into_model::<RoomTypeOption>()
            .all(db)
            .await?;

        let room_statuses = room_status::Entity::find()
            .order_by_asc(room_status::Column::StatusName)
            .into_model::<RoomStatusOption>()
            .all(db)
            .await?;

        Ok(RoomLookups {
            room_types,
            room_statuses,
        })
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<RoomListing>, ServiceError> {
        let rooms = room::Entity::find()
            .select_only()
            .column(room::Column::RoomId)
            .column(room::Column::RoomNumber)
            .column(room::Column::RoomTypeId)
            .column_as(room_type::Column::TypeName, "type_name")
            .column_as(room_type::Column::BaseRate, "base_rate")
            .column_as(room_type::Column::Capacity, "capacity")
            .column(room::Column::StatusId)
            .column_as(room_status::Column::StatusName, "status_name")
            .join(JoinType::InnerJoin, room::Relation::RoomType.def())
            .join(JoinType::InnerJoin, room::Relation::RoomStatus.def())
            .order_by_desc(room::Column::RoomId)
            .into_model::<RoomListing>()
            .all(&*self.db)
            .await?;

        Ok(rooms)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, room_id: i32) -> Result<RoomRecord, ServiceError> {
        room::Entity::find_by_id(room_id)
            .one(&*self.db)
            .await?
            .map(RoomRecord::from)
            .ok_or_else(|| ServiceError::NotFound(ROOM_NOT_FOUND.to_string()))
    }

    /// Inserts a room under the next free id and returns that id.
    #[instrument(skip(self))]
    pub async fn create(&self, input: RoomInput) -> Result<i32, ServiceError> {
        let txn = self.db.begin().await?;

        let room_id = next_id::<room::Entity, _>(&txn, room::Column::RoomId).await?;

        let model = room::ActiveModel {
            room_id: Set(room_id),
            room_number: Set(input.room_number),
            room_type_id: Set(input.room_type_id),
            status_id: Set(input.status_id),
        };
        room::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_insert_err(
                room::Column::RoomId,
                DUPLICATE_ROOM_NUMBER,
                UNKNOWN_ROOM_LOOKUP,
            )?;

        txn.commit().await?;

        info!(room_id, "Room created");
        Ok(room_id)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, room_id: i32, input: RoomInput) -> Result<u64, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = room::Entity::find_by_id(room_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ROOM_NOT_FOUND.to_string()))?;

        let mut model: room::ActiveModel = existing.into();
        model.room_number = Set(input.room_number);
        model.room_type_id = Set(input.room_type_id);
        model.status_id = Set(input.status_id);
        model
            .update(&txn)
            .await
            .map_write_err(DUPLICATE_ROOM_NUMBER, UNKNOWN_ROOM_LOOKUP)?;

        txn.commit().await?;

        info!(room_id, "Room updated");
        Ok(1)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, room_id: i32) -> Result<u64, ServiceError> {
        let result = room::Entity::delete_by_id(room_id)
            .exec(&*self.db)
            .await
            .map_delete_err(ROOM_IN_USE)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(ROOM_NOT_FOUND.to_string()));
        }

        info!(room_id, "Room deleted");
        Ok(result.rows_affected)
    }
}
