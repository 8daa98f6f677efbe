//! Command-line interface.
//!
//! Two subcommands: `analyze` evaluates a single host and prints the report,
//! `serve` exposes the same evaluation over HTTP. Every flag can also be set
//! through a `TLS_POSTURE_*` environment variable (or a `.env` file).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_SERVER_PORT, ENUMERATION_CONCURRENCY, HSTS_TIMEOUT_SECS,
    TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::config::types::{AnalyzerSettings, LogFormat, LogLevel};

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Grade a host and print the JSON report
/// tls_posture analyze example.com
///
/// # Skip cipher enumeration, custom port
/// tls_posture analyze example.com:8443 --no-enumerate
///
/// # Run the HTTP API
/// tls_posture serve --port 3000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "tls_posture",
    version,
    about = "Evaluates the TLS posture of a host: certificate, protocols, ciphers and an overall grade."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info, env = "TLS_POSTURE_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain, env = "TLS_POSTURE_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub probe: ProbeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate one host and print the report as JSON
    Analyze(AnalyzeArgs),
    /// Serve the evaluation over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Host to evaluate: a name, an IP literal, `host:port` or an http(s) URL
    pub domain: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS, env = "TLS_POSTURE_BIND")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_SERVER_PORT, env = "TLS_POSTURE_PORT")]
    pub port: u16,
}

/// Probe tuning shared by both subcommands.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// TCP connect timeout per probe, in seconds
    #[arg(long, global = true, default_value_t = TCP_CONNECT_TIMEOUT_SECS, env = "TLS_POSTURE_CONNECT_TIMEOUT")]
    pub connect_timeout: u64,

    /// TLS handshake timeout per probe, in seconds
    #[arg(long, global = true, default_value_t = TLS_HANDSHAKE_TIMEOUT_SECS, env = "TLS_POSTURE_HANDSHAKE_TIMEOUT")]
    pub handshake_timeout: u64,

    /// Overall evaluation deadline in seconds (default: four probe budgets)
    #[arg(long, global = true, env = "TLS_POSTURE_DEADLINE")]
    pub deadline: Option<u64>,

    /// Skip per-version cipher suite enumeration
    #[arg(long, global = true, env = "TLS_POSTURE_NO_ENUMERATE")]
    pub no_enumerate: bool,

    /// Versions enumerated concurrently
    #[arg(long, global = true, default_value_t = ENUMERATION_CONCURRENCY, env = "TLS_POSTURE_ENUMERATION_CONCURRENCY")]
    pub enumeration_concurrency: usize,

    /// Skip the HTTPS request that reads Strict-Transport-Security
    #[arg(long, global = true, env = "TLS_POSTURE_NO_HSTS")]
    pub no_hsts: bool,

    /// Timeout of the HSTS request, in seconds
    #[arg(long, global = true, default_value_t = HSTS_TIMEOUT_SECS, env = "TLS_POSTURE_HSTS_TIMEOUT")]
    pub hsts_timeout: u64,

    /// JSON file with client profiles for the handshake simulation
    #[arg(long, global = true, value_parser, env = "TLS_POSTURE_CLIENTS")]
    pub clients: Option<PathBuf>,
}

impl ProbeArgs {
    pub fn settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            handshake_timeout: Duration::from_secs(self.handshake_timeout),
            overall_deadline: self.deadline.map(Duration::from_secs),
            enumerate_ciphers: !self.no_enumerate,
            enumeration_concurrency: self.enumeration_concurrency.max(1),
            check_hsts: !self.no_hsts,
            hsts_timeout: Duration::from_secs(self.hsts_timeout),
        }
    }
}
