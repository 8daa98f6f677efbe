//! Configuration types.
//!
//! This module defines the enums and structs shared by the CLI and the
//! library API.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEADLINE_MULTIPLIER, ENUMERATION_CONCURRENCY, HSTS_TIMEOUT_SECS, TCP_CONNECT_TIMEOUT_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Analyzer configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tls_posture::AnalyzerSettings;
///
/// let settings = AnalyzerSettings {
///     handshake_timeout: Duration::from_secs(4),
///     enumerate_ciphers: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerSettings {
    /// TCP connect timeout per probe
    pub connect_timeout: Duration,

    /// TLS handshake timeout per probe
    pub handshake_timeout: Duration,

    /// Overall evaluation budget; `None` means `DEADLINE_MULTIPLIER` times the
    /// per-probe budget
    pub overall_deadline: Option<Duration>,

    /// Enumerate accepted cipher suites for each supported version
    pub enumerate_ciphers: bool,

    /// Versions enumerated concurrently
    pub enumeration_concurrency: usize,

    /// Fetch the HSTS header over HTTPS
    pub check_hsts: bool,

    /// Timeout of the HSTS request
    pub hsts_timeout: Duration,
}

impl AnalyzerSettings {
    /// Worst-case duration of a single probe.
    pub fn probe_budget(&self) -> Duration {
        self.connect_timeout + self.handshake_timeout
    }

    /// Effective overall evaluation budget.
    pub fn deadline(&self) -> Duration {
        self.overall_deadline
            .unwrap_or_else(|| self.probe_budget() * DEADLINE_MULTIPLIER)
    }
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            overall_deadline: None,
            enumerate_ciphers: true,
            enumeration_concurrency: ENUMERATION_CONCURRENCY,
            check_hsts: true,
            hsts_timeout: Duration::from_secs(HSTS_TIMEOUT_SECS),
        }
    }
}
