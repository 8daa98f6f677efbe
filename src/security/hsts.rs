//! Strict-Transport-Security lookup.

use log::{debug, warn};
use serde::Serialize;
use url::Url;

/// Parsed HSTS policy (RFC 6797).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HstsPolicy {
    pub max_age: u64,
    pub include_subdomains: bool,
    pub preload: bool,
}

/// Outcome of the HSTS check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HstsStatus {
    /// Disabled, or the request failed.
    #[default]
    NotChecked,
    /// Response carried no valid policy (absent, unparsable, or `max-age=0`).
    Missing,
    Present(HstsPolicy),
}

/// Parses a Strict-Transport-Security header value.
///
/// Returns `None` when the header is not a usable policy: `max-age` missing,
/// duplicated, not a number, or zero.
pub fn parse_hsts_header(value: &str) -> Option<HstsPolicy> {
    let mut max_age = None;
    let mut include_subdomains = false;
    let mut preload = false;

    for directive in value.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        let (name, argument) = match directive.split_once('=') {
            Some((name, argument)) => (name.trim(), Some(argument.trim().trim_matches('"'))),
            None => (directive, None),
        };

        if name.eq_ignore_ascii_case("max-age") {
            if max_age.is_some() {
                return None;
            }
            max_age = Some(argument?.parse::<u64>().ok()?);
        } else if name.eq_ignore_ascii_case("includeSubDomains") {
            include_subdomains = true;
        } else if name.eq_ignore_ascii_case("preload") {
            preload = true;
        }
    }

    match max_age {
        Some(0) | None => None,
        Some(max_age) => Some(HstsPolicy {
            max_age,
            include_subdomains,
            preload,
        }),
    }
}

fn origin(host: &str, port: u16) -> Option<Url> {
    let authority = if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    };
    Url::parse(&format!("https://{authority}/")).ok()
}

/// Requests `https://host:port/` once, without following redirects, and reads
/// its Strict-Transport-Security header. Failures are logged and reported as
/// [`HstsStatus::NotChecked`]; they never fail the evaluation.
pub async fn fetch_hsts(client: &reqwest::Client, host: &str, port: u16) -> HstsStatus {
    let Some(url) = origin(host, port) else {
        warn!("Cannot build HSTS URL for {host}:{port}");
        return HstsStatus::NotChecked;
    };

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("HSTS check failed for {url}: {e}");
            return HstsStatus::NotChecked;
        }
    };

    let policy = response
        .headers()
        .get(reqwest::header::STRICT_TRANSPORT_SECURITY)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_hsts_header);

    debug!("HSTS for {url} (status {}): {policy:?}", response.status());
    match policy {
        Some(policy) => HstsStatus::Present(policy),
        None => HstsStatus::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_policy() {
        let policy = parse_hsts_header("max-age=31536000; includeSubDomains; preload")
            .expect("valid policy");
        assert_eq!(policy.max_age, 31_536_000);
        assert!(policy.include_subdomains);
        assert!(policy.preload);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_accepts_quotes() {
        let policy = parse_hsts_header("Max-Age=\"600\"; INCLUDESUBDOMAINS").expect("valid policy");
        assert_eq!(policy.max_age, 600);
        assert!(policy.include_subdomains);
        assert!(!policy.preload);
    }

    #[test]
    fn test_parse_rejects_unusable_headers() {
        assert_eq!(parse_hsts_header(""), None);
        assert_eq!(parse_hsts_header("includeSubDomains"), None);
        assert_eq!(parse_hsts_header("max-age=abc"), None);
        assert_eq!(parse_hsts_header("max-age"), None);
        assert_eq!(parse_hsts_header("max-age=0"), None);
        assert_eq!(parse_hsts_header("max-age=1; max-age=2"), None);
    }

    #[test]
    fn test_origin_brackets_ipv6() {
        assert_eq!(
            origin("::1", 8443).map(|u| u.to_string()),
            Some("https://[::1]:8443/".to_string())
        );
        assert_eq!(
            origin("example.com", 443).map(|u| u.to_string()),
            Some("https://example.com/".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_checked() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let client = reqwest::Client::new();
        assert_eq!(fetch_hsts(&client, "127.0.0.1", port).await, HstsStatus::NotChecked);
    }

    /// HTTPS server on loopback answering every request with an HSTS header.
    async fn spawn_hsts_server() -> std::net::SocketAddr {
        use std::sync::Arc;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let certified = rcgen::generate_simple_self_signed(vec!["hsts.invalid".to_string()]).unwrap();
        let key = rustls::pki_types::PrivateKeyDer::Pkcs8(
            rustls::pki_types::PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()),
        );
        let config = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![certified.cert.der().clone()], key)
        .unwrap();
        let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    let Ok(mut tls) = acceptor.accept(stream).await else {
                        return;
                    };
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match tls.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let response = "HTTP/1.1 200 OK\r\n\
                        Strict-Transport-Security: max-age=600; includeSubDomains\r\n\
                        Content-Length: 0\r\n\
                        Connection: close\r\n\r\n";
                    let _ = tls.write_all(response.as_bytes()).await;
                    let _ = tls.shutdown().await;
                });
            }
        });
        address
    }

    #[tokio::test]
    async fn test_fetch_uses_the_pinned_address() {
        // `.invalid` never resolves, so a response proves the pin was used.
        let address = spawn_hsts_server().await;
        let client = crate::initialization::init_hsts_client(
            &crate::config::AnalyzerSettings::default(),
            "hsts.invalid",
            address,
        )
        .unwrap();

        let status = fetch_hsts(&client, "hsts.invalid", address.port()).await;
        assert_eq!(
            status,
            HstsStatus::Present(HstsPolicy {
                max_age: 600,
                include_subdomains: true,
                preload: false,
            })
        );
    }
}
