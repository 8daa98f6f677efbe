//! Evaluation handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;

use super::super::types::{AnalyzeRequest, ErrorResponse, ServerState};
use crate::error_handling::AnalysisError;

/// Message returned with every 500; details go to the log only.
const INTERNAL_ERROR_MESSAGE: &str = "Internal error while analyzing the host";

/// `POST /api/ssl/analyze` with `{ "domain": ".." }`
pub async fn analyze_post(
    State(state): State<ServerState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => analyze(&state, request).await,
        Err(rejection) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        ),
    }
}

/// `GET /api/ssl/analyze?domain=..`
pub async fn analyze_get(
    State(state): State<ServerState>,
    Query(request): Query<AnalyzeRequest>,
) -> Response {
    analyze(&state, request).await
}

async fn analyze(state: &ServerState, request: AnalyzeRequest) -> Response {
    let domain = request.domain.unwrap_or_default();
    match state.analyzer.analyze_input(&domain).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => analysis_error_response(&domain, &e),
    }
}

/// Client errors carry their message; internal errors are logged in full and
/// answered with a generic message.
pub(crate) fn analysis_error_response(domain: &str, e: &AnalysisError) -> Response {
    if e.is_client_error() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }
    match e {
        AnalysisError::Internal(inner) => error!("Analysis of {domain} failed: {inner:#}"),
        other => error!("Analysis of {domain} failed: {other}"),
    }
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_MESSAGE.to_string(),
    )
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
