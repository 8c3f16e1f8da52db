use super::common::success_response;
use crate::{
    errors::ServiceError,
    services::dashboard::{DashboardSummary, RoomsOverview},
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms_overview))
        .route("/summary", get(dashboard_summary))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/rooms",
    responses(
        (status = 200, description = "Room totals, counts per status and the room panel", body = RoomsOverview),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn rooms_overview(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let overview = state.services.dashboard.rooms().await?;
    Ok(success_response(overview))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Today's occupancy and inventory cards", body = DashboardSummary),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn dashboard_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.dashboard.summary().await?;
    Ok(success_response(summary))
}
