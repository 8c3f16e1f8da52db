use super::common::{
    created_response, not_blank, required, success_response, validate_input, ApiJson,
    DeletedResponse, UpdatedResponse,
};
use crate::{
    errors::ServiceError,
    services::rooms::{RoomInput, RoomListing, RoomLookups, RoomRecord},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

const REQUIRED_FIELDS: &str = "room_number, room_type_id, status_id are required";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoomRequest {
    #[validate(required, custom = "not_blank")]
    #[schema(example = "R101")]
    pub room_number: Option<String>,
    #[validate(required, range(min = 1))]
    pub room_type_id: Option<i32>,
    #[validate(required, range(min = 1))]
    pub status_id: Option<i32>,
}

impl RoomRequest {
    fn into_input(self) -> Result<RoomInput, ServiceError> {
        validate_input(&self, REQUIRED_FIELDS)?;
        Ok(RoomInput {
            room_number: required(self.room_number, REQUIRED_FIELDS)?.trim().to_string(),
            room_type_id: required(self.room_type_id, REQUIRED_FIELDS)?,
            status_id: required(self.status_id, REQUIRED_FIELDS)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomCreated {
    pub room_id: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lookups", get(room_lookups))
        .route("/", get(list_rooms).post(create_room))
        .route("/:id", get(get_room).put(update_room).delete(delete_room))
}

#[utoipa::path(
    get,
    path = "/api/rooms/lookups",
    responses(
        (status = 200, description = "Room types and statuses", body = RoomLookups),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn room_lookups(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let lookups = state.services.rooms.lookups().await?;
    Ok(success_response(lookups))
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    responses(
        (status = 200, description = "Rooms, newest first", body = [RoomListing]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let rooms = state.services.rooms.list().await?;
    Ok(success_response(rooms))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room found", body = RoomRecord),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let room = state.services.rooms.get(id).await?;
    Ok(success_response(room))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = RoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomCreated),
        (status = 400, description = "Missing fields or unknown type/status", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room number already exists", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RoomRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let room_id = state.services.rooms.create(input).await?;
    Ok(created_response(RoomCreated { room_id }))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room id")),
    request_body = RoomRequest,
    responses(
        (status = 200, description = "Room updated", body = UpdatedResponse),
        (status = 400, description = "Missing fields or unknown type/status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room number already exists", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<RoomRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let updated = state.services.rooms.update(id, input).await?;
    Ok(success_response(UpdatedResponse { updated }))
}

#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room deleted", body = DeletedResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room is used in transactions", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.services.rooms.delete(id).await?;
    Ok(success_response(DeletedResponse { deleted }))
}
