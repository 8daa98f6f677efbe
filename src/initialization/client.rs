//! HTTP client initialization.

use std::net::SocketAddr;

use reqwest::ClientBuilder;

use crate::config::{AnalyzerSettings, USER_AGENT};

/// Builds the client for one Strict-Transport-Security check.
///
/// The client:
/// - connects `host` to `address`, the endpoint the TLS probes used, instead
///   of resolving it again
/// - never follows redirects (the header must come from the probed origin)
/// - accepts any certificate, since trust is reported by the probes instead
/// - is bounded by `settings.hsts_timeout`
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_hsts_client(
    settings: &AnalyzerSettings,
    host: &str,
    address: SocketAddr,
) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .resolve(host, address)
        .redirect(reqwest::redirect::Policy::none())
        .danger_accept_invalid_certs(true)
        .timeout(settings.hsts_timeout)
        .connect_timeout(settings.connect_timeout)
        .user_agent(USER_AGENT)
        .build()
}
