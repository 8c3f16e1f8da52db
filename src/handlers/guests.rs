use super::common::{
    created_response, not_blank, required, success_response, validate_input, ApiJson,
    DeletedResponse, UpdatedResponse,
};
use crate::{
    errors::ServiceError,
    services::guests::{GuestInput, GuestLookups, GuestView},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

const REQUIRED_FIELDS: &str = "name, contact, gender_id, dob are required";
const INVALID_DOB: &str = "dob must be a date in YYYY-MM-DD format";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuestRequest {
    #[validate(required, custom = "not_blank")]
    #[schema(example = "Maria Santos")]
    pub name: Option<String>,
    #[validate(required, custom = "not_blank")]
    #[schema(example = "09171234567")]
    pub contact: Option<String>,
    #[validate(required, range(min = 1))]
    pub gender_id: Option<i32>,
    #[validate(required, custom = "not_blank")]
    #[schema(example = "1990-04-12")]
    pub dob: Option<String>,
}

/// Accepts a plain calendar date or an RFC 3339 timestamp, keeping the date.
fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

impl GuestRequest {
    fn into_input(self) -> Result<GuestInput, ServiceError> {
        validate_input(&self, REQUIRED_FIELDS)?;
        let dob = required(self.dob, REQUIRED_FIELDS)?;
        let dob = parse_dob(&dob)
            .ok_or_else(|| ServiceError::ValidationError(INVALID_DOB.to_string()))?;
        Ok(GuestInput {
            name: required(self.name, REQUIRED_FIELDS)?.trim().to_string(),
            contact: required(self.contact, REQUIRED_FIELDS)?.trim().to_string(),
            gender_id: required(self.gender_id, REQUIRED_FIELDS)?,
            dob,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuestCreated {
    pub guest_id: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lookups", get(guest_lookups))
        .route("/", get(list_guests).post(create_guest))
        .route("/:id", get(get_guest).put(update_guest).delete(delete_guest))
}

#[utoipa::path(
    get,
    path = "/api/guests/lookups",
    responses(
        (status = 200, description = "Gender options", body = GuestLookups),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "guests"
)]
pub async fn guest_lookups(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let lookups = state.services.guests.lookups().await?;
    Ok(success_response(lookups))
}

#[utoipa::path(
    get,
    path = "/api/guests",
    responses(
        (status = 200, description = "Guests ordered by id", body = [GuestView]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "guests"
)]
pub async fn list_guests(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let guests = state.services.guests.list().await?;
    Ok(success_response(guests))
}

#[utoipa::path(
    get,
    path = "/api/guests/{id}",
    params(("id" = i32, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Guest found", body = GuestView),
        (status = 404, description = "Guest not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "guests"
)]
pub async fn get_guest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let guest = state.services.guests.get(id).await?;
    Ok(success_response(guest))
}

#[utoipa::path(
    post,
    path = "/api/guests",
    request_body = GuestRequest,
    responses(
        (status = 201, description = "Guest created", body = GuestCreated),
        (status = 400, description = "Missing fields, bad date or unknown gender", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "guests"
)]
pub async fn create_guest(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GuestRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let guest_id = state.services.guests.create(input).await?;
    Ok(created_response(GuestCreated { guest_id }))
}

#[utoipa::path(
    put,
    path = "/api/guests/{id}",
    params(("id" = i32, Path, description = "Guest id")),
    request_body = GuestRequest,
    responses(
        (status = 200, description = "Guest updated", body = UpdatedResponse),
        (status = 400, description = "Missing fields, bad date or unknown gender", body = crate::errors::ErrorResponse),
        (status = 404, description = "Guest not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "guests"
)]
pub async fn update_guest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<GuestRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let updated = state.services.guests.update(id, input).await?;
    Ok(success_response(UpdatedResponse { updated }))
}

#[utoipa::path(
    delete,
    path = "/api/guests/{id}",
    params(("id" = i32, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Guest deleted", body = DeletedResponse),
        (status = 404, description = "Guest not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Guest is used in transactions", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "guests"
)]
pub async fn delete_guest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.services.guests.delete(id).await?;
    Ok(success_response(DeletedResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(dob: &str) -> GuestRequest {
        GuestRequest {
            name: Some("  Ana Cruz ".to_string()),
            contact: Some(" 0917 ".to_string()),
            gender_id: Some(2),
            dob: Some(dob.to_string()),
        }
    }

    #[test]
    fn dob_accepts_plain_and_timestamp_forms() {
        assert_eq!(parse_dob("1990-04-12"), NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(
            parse_dob("1990-04-12T00:00:00Z"),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert_eq!(parse_dob("12/04/1990"), None);
    }

    #[test]
    fn text_fields_are_trimmed() {
        let input = request("1990-04-12").into_input().unwrap();
        assert_eq!(input.name, "Ana Cruz");
        assert_eq!(input.contact, "0917");
    }

    #[test]
    fn unparseable_dob_is_rejected() {
        let err = request("1990-13-40").into_input().unwrap_err();
        assert_eq!(err.response_message(), INVALID_DOB);
    }
}
