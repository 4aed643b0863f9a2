//! Liveness check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// `GET /api/health`.
///
/// Answers `503` when the table store cannot be read.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check() {
        (
            StatusCode::OK,
            Json(json!({ "status": "ok", "message": "BillEase Suite API is running" })),
        )
    } else {
        warn!("Health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": "Database unavailable" })),
        )
    }
}
