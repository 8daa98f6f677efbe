//! Error handling.
//!
//! Errors are split by who can act on them:
//! - **Client errors**: invalid input or an unreachable target (HTTP 400)
//! - **Internal errors**: malformed certificates, grading input, anything unexpected (HTTP 500)
//!
//! Per-version probe failures are data, not errors, and live in
//! [`crate::models::ProbeFailure`].

mod types;

// Re-export public API
pub use types::{AnalysisError, CertificateError, GradingError, InitializationError};
