//! TLS probing.
//!
//! One probe per protocol version, each on its own TCP connection:
//! - TLS 1.2 and 1.3 through `tokio-rustls`, with a verifier that records the
//!   webpki verdict and OCSP stapling instead of enforcing them
//! - TLS 1.0 and 1.1 through a raw ClientHello (`handshake`), since rustls
//!   does not implement them
//! - TLS 1.2 again through the raw ClientHello when rustls gets an answer but
//!   no handshake, so legacy-only suites still count as support
//!
//! All four probes run concurrently and fail independently. A probe never
//! returns an error: failures are folded into
//! [`ProtocolProbeResult::error`](crate::models::ProtocolProbeResult).

mod enumerate;
pub mod handshake;
mod legacy;
mod modern;
pub mod suites;
mod verifier;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::debug;
use tokio::net::TcpStream;

use crate::config::AnalyzerSettings;
use crate::models::{
    CipherDescriptor, EphemeralKeyInfo, HandshakeFacts, ProbeFailure, ProtocolProbeResult,
    TlsVersion,
};

pub use enumerate::{enumerate_ciphers, Enumeration};
pub use verifier::{CapturingVerifier, Observation};

/// Endpoint a probe connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Host as given by the caller (name or IP literal).
    pub host: String,
    pub address: SocketAddr,
    /// SNI to send; `None` for IP literals.
    pub sni: Option<String>,
}

impl ProbeTarget {
    pub fn new(host: &str, address: SocketAddr) -> Self {
        let sni = match host.parse::<IpAddr>() {
            Ok(_) => None,
            Err(_) => Some(host.to_string()),
        };
        Self {
            host: host.to_string(),
            address,
            sni,
        }
    }
}

/// What a successful handshake told us.
#[derive(Debug, Clone)]
pub(crate) struct Negotiated {
    pub cipher: CipherDescriptor,
    pub ephemeral_key: Option<EphemeralKeyInfo>,
    pub certificates: Vec<Vec<u8>>,
    pub facts: HandshakeFacts,
}

/// Probes a single protocol version.
pub async fn probe(
    target: &ProbeTarget,
    version: TlsVersion,
    settings: &AnalyzerSettings,
) -> ProtocolProbeResult {
    let started = Instant::now();
    let outcome = match version {
        TlsVersion::Tls13 => modern::probe(target, version, settings).await,
        TlsVersion::Tls12 => match modern::probe(target, version, settings).await {
            Err(failure) if !failure.is_infrastructure() => {
                // rustls only speaks ECDHE with AEAD suites and refuses small
                // RSA keys and SHA-1 signatures. Servers limited to CBC,
                // static-RSA or DHE suites still speak TLS 1.2.
                debug!("{} TLS 1.2 via rustls failed ({failure}), retrying raw", target.address);
                legacy::probe(target, version, settings).await.map(|mut negotiated| {
                    let observation = CapturingVerifier::new(Arc::new(
                        rustls::crypto::ring::default_provider(),
                    ))
                    .observe_chain(&negotiated.certificates, &target.host);
                    negotiated.facts.trusted = observation.trusted;
                    negotiated.facts.trust_error = observation.trust_error;
                    negotiated
                })
            }
            outcome => outcome,
        },
        TlsVersion::Tls10 | TlsVersion::Tls11 => legacy::probe(target, version, settings).await,
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(negotiated) => {
            debug!(
                "{} {} negotiated {} in {latency_ms}ms",
                target.address, version, negotiated.cipher.name
            );
            ProtocolProbeResult::supported(
                version,
                negotiated.cipher,
                negotiated.ephemeral_key,
                negotiated.certificates,
                negotiated.facts,
                latency_ms,
            )
        }
        Err(failure) => {
            debug!("{} {} failed after {latency_ms}ms: {failure}", target.address, version);
            ProtocolProbeResult::unsupported(version, failure, latency_ms)
        }
    }
}

/// Probes every protocol version concurrently. Results come back in
/// [`TlsVersion::ALL`] order regardless of completion order.
pub async fn probe_all(target: &ProbeTarget, settings: &AnalyzerSettings) -> Vec<ProtocolProbeResult> {
    join_all(
        TlsVersion::ALL
            .iter()
            .map(|version| probe(target, *version, settings)),
    )
    .await
}

/// Opens the TCP connection for one probe.
pub(crate) async fn connect(
    target: &ProbeTarget,
    settings: &AnalyzerSettings,
) -> Result<TcpStream, ProbeFailure> {
    match tokio::time::timeout(settings.connect_timeout, TcpStream::connect(target.address)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(classify_io(&e)),
        Err(_) => Err(ProbeFailure::Timeout),
    }
}

/// Maps a socket error seen during connect or handshake.
pub(crate) fn classify_io(error: &std::io::Error) -> ProbeFailure {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::ConnectionRefused => ProbeFailure::ConnectionRefused,
        ErrorKind::TimedOut => ProbeFailure::Timeout,
        // A server that does not speak the version usually just hangs up.
        ErrorKind::UnexpectedEof
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe => ProbeFailure::NotOffered,
        _ => ProbeFailure::Network(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_probe_target_sni() {
        let addr: SocketAddr = "93.184.216.34:443".parse().expect("addr");
        assert_eq!(
            ProbeTarget::new("example.com", addr).sni.as_deref(),
            Some("example.com")
        );
        assert_eq!(ProbeTarget::new("93.184.216.34", addr).sni, None);
        assert_eq!(ProbeTarget::new("::1", addr).sni, None);
    }

    #[test]
    fn test_classify_io() {
        assert_eq!(
            classify_io(&Error::from(ErrorKind::ConnectionRefused)),
            ProbeFailure::ConnectionRefused
        );
        assert_eq!(
            classify_io(&Error::from(ErrorKind::ConnectionReset)),
            ProbeFailure::NotOffered
        );
        assert_eq!(
            classify_io(&Error::from(ErrorKind::TimedOut)),
            ProbeFailure::Timeout
        );
        assert!(matches!(
            classify_io(&Error::new(ErrorKind::Other, "no route to host")),
            ProbeFailure::Network(_)
        ));
    }

    #[tokio::test]
    async fn test_probe_all_refused_port_reports_every_version() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let target = ProbeTarget::new("127.0.0.1", addr);
        let results = probe_all(&target, &AnalyzerSettings::default()).await;

        assert_eq!(results.len(), 4);
        for (result, version) in results.iter().zip(TlsVersion::ALL) {
            assert_eq!(result.version, version);
            assert!(!result.supported);
            assert_eq!(result.error, Some(ProbeFailure::ConnectionRefused));
        }
    }
}
