//! Configuration constants.
//!
//! Defaults for timeouts, limits and the HTTP surface.

/// Port probed when the input does not name one.
pub const DEFAULT_PORT: u16 = 443;

// Network operation timeouts
/// TCP connect timeout per probe, in seconds.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout per probe, in seconds (after the TCP connect).
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 8;
/// DNS query timeout in seconds.
/// Most queries complete in well under a second; 3s fails fast on dead resolvers.
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Timeout for the single HTTPS request that reads the HSTS header.
pub const HSTS_TIMEOUT_SECS: u64 = 5;
/// Overall evaluation budget, as a multiple of the per-probe budget
/// (connect + handshake).
pub const DEADLINE_MULTIPLIER: u32 = 4;

/// Versions enumerated for cipher support at the same time.
pub const ENUMERATION_CONCURRENCY: usize = 4;

// Input limits
/// Longest accepted raw `domain` input, URL form included.
pub const MAX_INPUT_LENGTH: usize = 2048;
/// Longest DNS name (RFC 1035).
pub const MAX_HOST_LENGTH: usize = 253;
/// Shortest accepted host after stripping scheme, path and port.
pub const MIN_HOST_LENGTH: usize = 3;

// HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// User-Agent for the HSTS request.
pub const USER_AGENT: &str = concat!("tls_posture/", env!("CARGO_PKG_VERSION"));
