//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, defaults)
//! - Analyzer settings shared by the CLI and the library API
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{AnalyzeArgs, Cli, Command, ProbeArgs, ServeArgs};
pub use constants::*;
pub use types::{AnalyzerSettings, LogFormat, LogLevel};
