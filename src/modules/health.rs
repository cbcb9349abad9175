//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use openschool_core::{AppError, ErrorResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and store are reachable", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = ErrorResponse)
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
