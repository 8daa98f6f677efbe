//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use std::time::Duration;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error loading the client catalog file.
    #[error("Client catalog error: {0}")]
    CatalogError(String),
}

/// Malformed input to the grading engine.
///
/// Grading never substitutes defaults for missing data; it fails with one of
/// these instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// A field the composite score depends on is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A component score outside 0..=100.
    #[error("{field} out of range: {value}")]
    ScoreOutOfRange { field: &'static str, value: u16 },
}

/// Failure to turn a presented chain into a certificate record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// The chain was empty.
    #[error("no certificate presented")]
    Missing,

    /// The leaf could not be parsed as X.509.
    #[error("{0}")]
    Malformed(String),
}

/// Errors that abort a whole evaluation.
///
/// Per-version probe failures are not errors; they are recorded in the probe
/// result. Only conditions that make a grade impossible end up here.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The `domain` input failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// DNS resolution failed.
    #[error("cannot resolve host {host}: {message}")]
    Resolution { host: String, message: String },

    /// No probe could open a connection.
    #[error("cannot connect to host {host}:{port}: {message}")]
    Unreachable {
        host: String,
        port: u16,
        message: String,
    },

    /// Every probe finished but none returned a peer certificate.
    #[error("cannot connect to host {0}: no certificate obtained from any protocol version")]
    MissingCertificate(String),

    /// The overall evaluation budget ran out.
    #[error("analysis did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    /// The peer certificate could not be parsed.
    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),

    #[error("grading failed: {0}")]
    Grading(#[from] GradingError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AnalysisError {
    /// True for conditions the caller can fix or retry (bad input, unreachable
    /// host). Everything else is an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidInput(_)
                | AnalysisError::Resolution { .. }
                | AnalysisError::Unreachable { .. }
                | AnalysisError::MissingCertificate(_)
                | AnalysisError::DeadlineExceeded(_)
        )
    }
}
