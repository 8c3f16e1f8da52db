use super::common::{
    created_response, not_blank, required, success_response, validate_input, ApiJson,
    DeletedResponse,
};
use crate::{
    errors::ServiceError,
    services::transactions::{SaleInput, SaleLine, TransactionInput, TransactionView},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

const REQUIRED_STAY_FIELDS: &str = "guest_id, room_id, checkin, amount are required";
const REQUIRED_SALE_FIELDS: &str = "inv_id, quantity, unit_cost are required";

/// Largest value a `DECIMAL(10,2)` money column holds.
fn max_money() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Money must fit the `DECIMAL(10,2)` columns: not negative, at most
/// 99,999,999.99 and no more than two decimal places.
fn money_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative"));
    }
    if *value > max_money() {
        return Err(ValidationError::new("too_large"));
    }
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("too_precise"));
    }
    Ok(())
}

/// Parses the date-time forms a browser sends: `datetime-local` values
/// with or without seconds, a space separator, or a full RFC 3339
/// timestamp (converted to UTC).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransactionRequest {
    #[validate(required, range(min = 1))]
    pub guest_id: Option<i32>,
    #[validate(required, range(min = 1))]
    pub room_id: Option<i32>,
    #[validate(required, custom = "not_blank")]
    #[schema(example = "2025-01-25T14:00")]
    pub checkin: Option<String>,
    #[schema(example = "2025-01-27T12:00")]
    pub checkout: Option<String>,
    #[validate(required, custom = "money_amount")]
    #[schema(value_type = Option<String>, example = "4500.00")]
    pub amount: Option<Decimal>,
}

impl TransactionRequest {
    fn into_input(self) -> Result<TransactionInput, ServiceError> {
        validate_input(&self, REQUIRED_STAY_FIELDS)?;

        let checkin = required(self.checkin, REQUIRED_STAY_FIELDS)?;
        let checkin = parse_datetime(&checkin).ok_or_else(|| {
            ServiceError::ValidationError("checkin is not a valid date-time".to_string())
        })?;
        let checkout = match self.checkout.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_datetime(raw).ok_or_else(|| {
                ServiceError::ValidationError("checkout is not a valid date-time".to_string())
            })?),
        };

        Ok(TransactionInput {
            guest_id: required(self.guest_id, REQUIRED_STAY_FIELDS)?,
            room_id: required(self.room_id, REQUIRED_STAY_FIELDS)?,
            checkin,
            checkout,
            amount: required(self.amount, REQUIRED_STAY_FIELDS)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaleRequest {
    #[validate(required, range(min = 1))]
    pub inv_id: Option<i32>,
    #[validate(required, range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(required, custom = "money_amount")]
    #[schema(value_type = Option<String>, example = "35.00")]
    pub unit_cost: Option<Decimal>,
}

impl SaleRequest {
    fn into_input(self) -> Result<SaleInput, ServiceError> {
        validate_input(&self, REQUIRED_SALE_FIELDS)?;
        Ok(SaleInput {
            inv_id: required(self.inv_id, REQUIRED_SALE_FIELDS)?,
            quantity: required(self.quantity, REQUIRED_SALE_FIELDS)?,
            unit_cost: required(self.unit_cost, REQUIRED_SALE_FIELDS)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionCreated {
    pub trans_id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleCreated {
    pub sale_id: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:id", delete(delete_transaction))
        .route("/:id/sales", get(list_sales).post(create_sale))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Stays, newest first", body = [TransactionView]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let stays = state.services.transactions.list().await?;
    Ok(success_response(stays))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Stay recorded", body = TransactionCreated),
        (status = 400, description = "Missing fields, bad dates or unknown guest/room", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let trans_id = state.services.transactions.create(input).await?;
    Ok(created_response(TransactionCreated { trans_id }))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(("id" = i32, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Stay deleted", body = DeletedResponse),
        (status = 404, description = "Transaction not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Transaction has sales records", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.services.transactions.delete(id).await?;
    Ok(success_response(DeletedResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}/sales",
    params(("id" = i32, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Sale lines of the stay", body = [SaleLine]),
        (status = 404, description = "Transaction not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let lines = state.services.transactions.sales(id).await?;
    Ok(success_response(lines))
}

#[utoipa::path(
    post,
    path = "/api/transactions/{id}/sales",
    params(("id" = i32, Path, description = "Transaction id")),
    request_body = SaleRequest,
    responses(
        (status = 201, description = "Sale recorded and stock decremented", body = SaleCreated),
        (status = 400, description = "Missing or invalid fields", body = crate::errors::ErrorResponse),
        (status = 404, description = "Transaction or item not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<SaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = payload.into_input()?;
    let sale_id = state.services.transactions.add_sale(id, input).await?;
    Ok(created_response(SaleCreated { sale_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn datetime_forms_from_browsers_parse() {
        let expected = NaiveDateTime::parse_from_str("2025-01-25 14:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(parse_datetime("2025-01-25T14:00"), Some(expected));
        assert_eq!(parse_datetime("2025-01-25T14:00:00"), Some(expected));
        assert_eq!(parse_datetime("2025-01-25 14:00:00"), Some(expected));
        assert_eq!(parse_datetime("2025-01-25T22:00:00+08:00"), Some(expected));
        assert_eq!(parse_datetime("tomorrow"), None);
    }

    #[test]
    fn blank_checkout_means_open_stay() {
        let input = TransactionRequest {
            guest_id: Some(1),
            room_id: Some(1),
            checkin: Some("2025-01-25T14:00".to_string()),
            checkout: Some("  ".to_string()),
            amount: Some(dec!(1500)),
        }
        .into_input()
        .unwrap();
        assert!(input.checkout.is_none());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = SaleRequest {
            inv_id: Some(1),
            quantity: Some(1),
            unit_cost: Some(dec!(-0.01)),
        }
        .into_input()
        .unwrap_err();
        assert_eq!(err.response_message(), "Invalid value for unit_cost");
    }

    #[rstest::rstest]
    #[case(dec!(0), true)]
    #[case(dec!(35.50), true)]
    #[case(dec!(35.500), true)]
    #[case(dec!(99999999.99), true)]
    #[case(dec!(100000000.00), false)]
    #[case(dec!(79228162514264337593543950335), false)]
    #[case(dec!(12.345), false)]
    #[case(dec!(-1), false)]
    fn money_must_fit_the_column(#[case] value: Decimal, #[case] accepted: bool) {
        assert_eq!(money_amount(&value).is_ok(), accepted, "{value}");
    }

    #[test]
    fn oversized_stay_amount_is_rejected() {
        let err = TransactionRequest {
            guest_id: Some(1),
            room_id: Some(1),
            checkin: Some("2025-01-25T14:00".to_string()),
            checkout: None,
            amount: Some(dec!(123456789012345678.125)),
        }
        .into_input()
        .unwrap_err();
        assert_eq!(err.response_message(), "Invalid value for amount");
    }

    #[test]
    fn missing_sale_quantity_reports_required_fields() {
        let err = SaleRequest {
            inv_id: Some(1),
            quantity: None,
            unit_cost: Some(dec!(10)),
        }
        .into_input()
        .unwrap_err();
        assert_eq!(err.response_message(), REQUIRED_SALE_FIELDS);
    }
}
