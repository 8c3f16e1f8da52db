use crate::{
    db::next_id,
    entities::{gender, guest},
    errors::{DbResultExt, ServiceError},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

pub const GUEST_NOT_FOUND: &str = "Guest not found";
pub const DUPLICATE_GUEST: &str = "Guest already exists";
pub const UNKNOWN_GENDER: &str = "gender_id does not exist";
pub const GUEST_IN_USE: &str = "Cannot delete: guest is used in other records (transactions).";

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct GenderOption {
    pub gender_id: i32,
    pub gender_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuestLookups {
    pub genders: Vec<GenderOption>,
}

/// Guest with the gender name resolved. `dob` renders as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct GuestView {
    pub guest_id: i32,
    pub name: String,
    pub contact: String,
    pub gender_id: i32,
    pub gender_name: String,
    #[schema(value_type = String, format = Date, example = "1990-04-12")]
    pub dob: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct GuestInput {
    pub name: String,
    pub contact: String,
    pub gender_id: i32,
    pub dob: NaiveDate,
}

#[derive(Clone)]
pub struct GuestService {
    db: Arc<DatabaseConnection>,
}

impl GuestService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn joined() -> Select<guest::Entity> {
        guest::Entity::find()
            .select_only()
            .column(guest::Column::GuestId)
            .column(guest::Column::Name)
            .column(guest::Column::Contact)
            .column(guest::Column::GenderId)
            .column_as(gender::Column::GenderName, "gender_name")
            .column(guest::Column::Dob)
            .join(JoinType::InnerJoin, guest::Relation::Gender.def())
    }

    #[instrument(skip(self))]
    pub async fn lookups(&self) -> Result<GuestLookups, ServiceError> {
        let genders = gender::Entity::find()
            .order_by_asc(gender::Column::GenderName)
            .into_model::<GenderOption>()
            .all(&*self.db)
            .await?;

        Ok(GuestLookups { genders })
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<GuestView>, ServiceError> {
        let guests = Self::joined()
            .order_by_asc(guest::Column::GuestId)
            .into_model::<GuestView>()
            .all(&*self.db)
            .await?;

        Ok(guests)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, guest_id: i32) -> Result<GuestView, ServiceError> {
        Self::joined()
            .filter(guest::Column::GuestId.eq(guest_id))
            .into_model::<GuestView>()
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(GUEST_NOT_FOUND.to_string()))
    }

    #[instrument(skip(self, input), fields(gender_id = input.gender_id))]
    pub async fn create(&self, input: GuestInput) -> Result<i32, ServiceError> {
        let txn = self.db.begin().await?;

        let guest_id = next_id::<guest::Entity, _>(&txn, guest::Column::GuestId).await?;

        let model = guest::ActiveModel {
            guest_id: Set(guest_id),
            name: Set(input.name),
            contact: Set(input.contact),
            gender_id: Set(input.gender_id),
            dob: Set(input.dob),
        };
        guest::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_insert_err(guest::Column::GuestId, DUPLICATE_GUEST, UNKNOWN_GENDER)?;

        txn.commit().await?;

        info!(guest_id, "Guest created");
        Ok(guest_id)
    }

    #[instrument(skip(self, input), fields(gender_id = input.gender_id))]
    pub async fn update(&self, guest_id: i32, input: GuestInput) -> Result<u64, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = guest::Entity::find_by_id(guest_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(GUEST_NOT_FOUND.to_string()))?;

        let mut model: guest::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.contact = Set(input.contact);
        model.gender_id = Set(input.gender_id);
        model.dob = Set(input.dob);
        model
            .update(&txn)
            .await
            .map_write_err(DUPLICATE_GUEST, UNKNOWN_GENDER)?;

        txn.commit().await?;

        info!(guest_id, "Guest updated");
        Ok(1)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, guest_id: i32) -> Result<u64, ServiceError> {
        let result = guest::Entity::delete_by_id(guest_id)
            .exec(&*self.db)
            .await
            .map_delete_err(GUEST_IN_USE)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(GUEST_NOT_FOUND.to_string()));
        }

        info!(guest_id, "Guest deleted");
        Ok(result.rows_affected)
    }
}
