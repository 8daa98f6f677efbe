//! Server request/response types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::run::Analyzer;

/// Shared state for the handlers
#[derive(Clone)]
pub struct ServerState {
    pub analyzer: Arc<Analyzer>,
}

/// Body of `POST /api/ssl/analyze` and query of the GET form.
///
/// `domain` is optional at this layer so a missing field gets the same
/// validation message as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub domain: Option<String>,
}

/// JSON error payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON response for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
