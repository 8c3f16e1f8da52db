use super::common::{
    created_response, not_blank, required, success_response, validate_input, ApiJson,
    DeletedResponse, UpdatedResponse,
};
use crate::{
    errors::ServiceError,
    services::inventory::{
        InventoryInput, InventoryItemView, InventoryLookups, InventorySummary, LowStockItem,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const REQUIRED_FIELDS: &str = "name, category_id, inv_type_id, quantity are required";

/// Inventory payload. `invstat_id` is accepted for compatibility and
/// ignored: the status is always derived from `quantity`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InventoryRequest {
    #[validate(required, custom = "not_blank")]
    #[schema(example = "Bath Towel")]
    pub name: Option<String>,
    #[validate(required, range(min = 1))]
    pub category_id: Option<i32>,
    #[validate(required, range(min = 1))]
    pub inv_type_id: Option<i32>,
    #[validate(required, range(min = 0))]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub invstat_id: Option<i32>,
}

impl InventoryRequest {
    fn into_input(self) -> Result<InventoryInput, ServiceError> {
        validate_input(&self, REQUIRED_FIELDS)?;
        if let Some(ignored) = self.invstat_id {
            tracing::debug!(invstat_id = ignored, "ignoring client-supplied inventory status");
        }
        Ok(InventoryInput {
            name: required(self.name, REQUIRED_FIELDS)?.trim().to_string(),
            category_id: required(self.category_id, REQUIRED_FIELDS)?,
            inv_type_id: required(self.inv_type_id, REQUIRED_FIELDS)?,
            quantity: required(self.quantity, REQUIRED_FIELDS)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryCreated {
    pub inv_id: i32,
}

/// `limit` is read leniently: absent, zero, negative or non-numeric values
/// fall back to the default, larger values are capped.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LowStockParams {
    pub limit: Option<String>,
}

impl LowStockParams {
    pub fn effective_limit(&self, default_limit: u64, max_limit: u64) -> u64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n as u64)
            .unwrap_or(default_limit)
            .min(max_limit)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lookups", get(inventory_lookups))
        .route("/summary", get(inventory_summary))
        .route("/low-stock", get(low_stock_items))
        .route("/", get(list_inventory).post(create_inventory))
        .route(
            "/:id",
            get(get_inventory_item)
                .put(update_inventory)
                .delete(delete_inventory),
        )
}

#[utoipa::path(
    get,
    path = "/api/inventory/lookups",
    responses(
        (status = 200, description = "Categories, types and statuses", body = InventoryLookups),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn inventory_lookups(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let lookups = state.services.inventory.lookups().await?;
    Ok(success_response(lookups))
}

#[utoipa::path(
    get,
    path = "/api/inventory/summary",
    responses(
        (status = 200, description = "Item counts per stock level", body = InventorySummary),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn inventory_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.inventory.summary().await?;
    Ok(success_response(summary))
}

#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    params(LowStockParams),
    responses(
        (status = 200, description = "In-stock items below the threshold, scarcest first", body = [LowStockItem]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn low_stock_items(
    State(state): State<AppState>,
    Query(params): Query<LowStockParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let limit = params.effective_limit(
        state.config.low_stock_default_limit,
        state.config.low_stock_max_limit,
    );
    let items = state.services.inventory.low_stock(limit).await?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/inventory",
    responses(
        (status = 200, description = "Inventory items with derived status", body = [InventoryItemView]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.services.inventory.list().await?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Inventory item", body = InventoryItemView),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.inventory.get(id).await?;
    Ok(success_response(item))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = InventoryRequest,
    responses(
        (status = 201, description = "Inventory item created", body = InventoryCreated),
        (status = 400, description = "Missing fields or unknown category/type", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<InventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let inv_id = state.services.inventory.create(input).await?;
    Ok(created_response(InventoryCreated { inv_id }))
}

#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory item id")),
    request_body = InventoryRequest,
    responses(
        (status = 200, description = "Inventory item updated", body = UpdatedResponse),
        (status = 400, description = "Missing fields or unknown category/type", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<InventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let updated = state.services.inventory.update(id, input).await?;
    Ok(success_response(UpdatedResponse { updated }))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Inventory item deleted", body = DeletedResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item is used in other records", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_inventory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.services.inventory.delete(id).await?;
    Ok(success_response(DeletedResponse { deleted }))
}
