//! Target host parsing and validation.
//!
//! The `domain` input of an evaluation request may be a bare host name, an IP
//! literal, `host:port`, or an `http(s)` URL. Scheme, path, query and fragment
//! are discarded; an explicit port is kept, otherwise 443 is used.
//!
//! Validation happens here, before any network activity:
//! - `parse()` - builds an immutable [`TargetHost`] or fails with
//!   [`AnalysisError::InvalidInput`]

use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DEFAULT_PORT, MAX_HOST_LENGTH, MAX_INPUT_LENGTH, MIN_HOST_LENGTH};
use crate::error_handling::AnalysisError;

/// LDH labels of 1-63 characters, dot separated.
static HOST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*$")
        .expect("Failed to compile host name pattern - this is a bug")
});

/// A validated host and port. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHost {
    host: String,
    port: u16,
    ip: Option<IpAddr>,
}

impl TargetHost {
    /// Parses and validates user input.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] if the input is empty, contains
    /// whitespace, uses a scheme other than http/https, or does not reduce to a
    /// syntactically valid host name or IP literal.
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid("Domain is required"));
        }
        if input.len() > MAX_INPUT_LENGTH {
            return Err(invalid("Domain input is too long"));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(invalid("Domain must not contain whitespace"));
        }

        let (host, port) = if input.contains("://") {
            split_url(input)?
        } else {
            split_authority(strip_suffixes(input))?
        };

        Self::new(&host, port.unwrap_or(DEFAULT_PORT))
    }

    /// Validates an already separated host and port.
    pub fn new(host: &str, port: u16) -> Result<Self, AnalysisError> {
        if port == 0 {
            return Err(invalid("Port must be between 1 and 65535"));
        }

        let host = host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim_end_matches('.')
            .to_ascii_lowercase();

        if host.len() < MIN_HOST_LENGTH {
            return Err(invalid(&format!(
                "Domain must be at least {MIN_HOST_LENGTH} characters"
            )));
        }
        if host.len() > MAX_HOST_LENGTH {
            return Err(invalid(&format!(
                "Domain must be at most {MAX_HOST_LENGTH} characters"
            )));
        }

        let ip = host.parse::<IpAddr>().ok();
        if ip.is_none() && !HOST_NAME.is_match(&host) {
            return Err(invalid(&format!("Invalid domain: {host}")));
        }

        Ok(Self { host, port, ip })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address itself when the host is an IP literal (no DNS needed).
    pub fn ip_literal(&self) -> Option<IpAddr> {
        self.ip
    }
}

impl fmt::Display for TargetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            Some(IpAddr::V6(_)) => write!(f, "[{}]:{}", self.host, self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

fn invalid(message: &str) -> AnalysisError {
    AnalysisError::InvalidInput(message.to_string())
}

fn split_url(input: &str) -> Result<(String, Option<u16>), AnalysisError> {
    let parsed = url::Url::parse(input).map_err(|e| invalid(&format!("Invalid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(&format!(
            "Unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("URL has no host"))?;
    // `Url::port` is None for the scheme default, so http://host:80 keeps 443.
    Ok((host.to_string(), parsed.port()))
}

/// Drops everything from the first path, query or fragment delimiter.
fn strip_suffixes(input: &str) -> &str {
    input
        .find(['/', '?', '#'])
        .map_or(input, |end| &input[..end])
}

fn split_authority(authority: &str) -> Result<(String, Option<u16>), AnalysisError> {
    // [v6]:port or [v6]
    if let Some(rest) = authority.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| invalid("Unterminated IPv6 literal"))?;
        let port = match after.strip_prefix(':') {
            Some(port) => Some(parse_port(port)?),
            None if after.is_empty() => None,
            None => return Err(invalid("Unexpected characters after IPv6 literal")),
        };
        return Ok((host.to_string(), port));
    }

    // Several colons: a bare IPv6 literal, which cannot carry a port.
    match authority.matches(':').count() {
        0 => Ok((authority.to_string(), None)),
        1 => {
            let (host, port) = authority
                .split_once(':')
                .ok_or_else(|| invalid("Invalid host:port"))?;
            Ok((host.to_string(), Some(parse_port(port)?)))
        }
        _ => Ok((authority.to_string(), None)),
    }
}

fn parse_port(raw: &str) -> Result<u16, AnalysisError> {
    raw.parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| invalid(&format!("Invalid port: {raw}")))
}
