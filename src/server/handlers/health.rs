//! Liveness handler.

use axum::Json;

use super::super::types::HealthResponse;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
