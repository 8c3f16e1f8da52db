use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, ColumnTrait, EntityName, IdenStatic, SqlErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Conflict",
    "message": "Room number already exists",
    "request_id": "req-abc123xyz",
    "timestamp": "2025-01-25T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request", "Internal Server Error")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Room not found")]
    pub message: String,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientStock(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            Self::NotFound(msg)
            | Self::ValidationError(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::InsufficientStock(msg)
            | Self::ServiceUnavailable(msg) => msg.clone(),
        }
    }

    /// Collapses validator output into one message. Missing or blank fields
    /// report the resource's list of required fields; anything else names
    /// the offending fields.
    pub fn from_validation(errors: ValidationErrors, required_message: &str) -> Self {
        let field_errors = errors.field_errors();
        let missing = field_errors.values().any(|errs| {
            errs.iter()
                .any(|e| e.code == "required" || e.code == "blank")
        });
        if missing {
            return ServiceError::ValidationError(required_message.to_string());
        }

        let mut fields: Vec<&str> = field_errors.keys().copied().collect();
        fields.sort_unstable();
        ServiceError::ValidationError(format!("Invalid value for {}", fields.join(", ")))
    }
}

/// Constraint a failed statement tripped, as classified by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique(String),
    ForeignKey(String),
}

/// Classifies a database error into the two constraint kinds the API surfaces.
pub fn constraint_violation(err: &DbErr) -> Option<ConstraintViolation> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(detail) => Some(ConstraintViolation::Unique(detail)),
        SqlErr::ForeignKeyConstraintViolation(detail) => {
            Some(ConstraintViolation::ForeignKey(detail))
        }
        _ => None,
    }
}

/// Message for an insert that lost the `MAX(id)+1` race to another writer.
pub const ID_TAKEN: &str = "Record id was taken by a concurrent insert; retry the request";

/// Whether a unique-violation detail names the primary key of `table`.
///
/// SQLite reports `table.column`, Postgres the `table_pkey` index and
/// MySQL the `PRIMARY` key.
pub fn is_primary_key_violation(detail: &str, table: &str, column: &str) -> bool {
    detail.contains(&format!("{table}.{column}"))
        || detail.contains(&format!("{table}_pkey"))
        || detail.contains("PRIMARY'")
}

fn write_error(err: DbErr, duplicate: &str, missing_reference: &str) -> ServiceError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique(detail)) => {
            tracing::warn!(detail = %detail, "unique constraint rejected write");
            ServiceError::Conflict(duplicate.to_string())
        }
        Some(ConstraintViolation::ForeignKey(detail)) => {
            tracing::warn!(detail = %detail, "foreign key constraint rejected write");
            ServiceError::BadRequest(missing_reference.to_string())
        }
        None => {
            tracing::error!(error = %err, "database write failed");
            ServiceError::DatabaseError(err)
        }
    }
}

/// Maps constraint failures of write statements onto API errors.
///
/// On insert/update a foreign-key failure means the payload points at a
/// lookup row that does not exist; on delete it means other rows still
/// reference the target.
pub trait DbResultExt<T> {
    fn map_write_err(self, duplicate: &str, missing_reference: &str) -> Result<T, ServiceError>;
    /// Like [`DbResultExt::map_write_err`] for inserts with a generated id:
    /// a collision on `primary_key` is reported as [`ID_TAKEN`] rather than
    /// as a duplicate natural key.
    fn map_insert_err<C: ColumnTrait>(
        self,
        primary_key: C,
        duplicate: &str,
        missing_reference: &str,
    ) -> Result<T, ServiceError>;
    fn map_delete_err(self, referenced: &str) -> Result<T, ServiceError>;
}

impl<T> DbResultExt<T> for Result<T, DbErr> {
    fn map_write_err(self, duplicate: &str, missing_reference: &str) -> Result<T, ServiceError> {
        self.map_err(|err| write_error(err, duplicate, missing_reference))
    }

    fn map_insert_err<C: ColumnTrait>(
        self,
        primary_key: C,
        duplicate: &str,
        missing_reference: &str,
    ) -> Result<T, ServiceError> {
        self.map_err(|err| {
            if let Some(ConstraintViolation::Unique(detail)) = constraint_violation(&err) {
                let table = C::EntityName::default();
                if is_primary_key_violation(&detail, table.table_name(), primary_key.as_str()) {
                    tracing::warn!(detail = %detail, "generated id collided with a concurrent insert");
                    return ServiceError::Conflict(ID_TAKEN.to_string());
                }
            }
            write_error(err, duplicate, missing_reference)
        })
    }

    fn map_delete_err(self, referenced: &str) -> Result<T, ServiceError> {
        self.map_err(|err| match constraint_violation(&err) {
            Some(ConstraintViolation::ForeignKey(detail)) => {
                tracing::warn!(detail = %detail, "foreign key constraint rejected delete");
                ServiceError::Conflict(referenced.to_string())
            }
            _ => {
                tracing::error!(error = %err, "database delete failed");
                ServiceError::DatabaseError(err)
            }
        })
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
