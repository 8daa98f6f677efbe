//! rustls-backed probes for TLS 1.2 and TLS 1.3.

use std::sync::Arc;

use log::trace;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, Error as RustlsError, SupportedProtocolVersion};
use tokio_rustls::TlsConnector;

use crate::config::AnalyzerSettings;
use crate::models::{HandshakeFacts, ProbeFailure, TlsVersion};
use crate::tls::handshake::group_key_info;
use crate::tls::verifier::CapturingVerifier;
use crate::tls::{classify_io, connect, suites, Negotiated, ProbeTarget};

fn protocol_version(version: TlsVersion) -> &'static SupportedProtocolVersion {
    match version {
        TlsVersion::Tls13 => &rustls::version::TLS13,
        _ => &rustls::version::TLS12,
    }
}

/// Completes a handshake pinned to `version` and reads what was negotiated.
pub(crate) async fn probe(
    target: &ProbeTarget,
    version: TlsVersion,
    settings: &AnalyzerSettings,
) -> Result<Negotiated, ProbeFailure> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = Arc::new(CapturingVerifier::new(provider.clone()));

    let config = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(&[protocol_version(version)])
        .map_err(|e| ProbeFailure::Network(format!("TLS configuration rejected: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(verifier.clone())
        .with_no_client_auth();

    // `try_from` accepts IP literals as well as DNS names.
    let server_name = ServerName::try_from(target.host.clone())
        .map_err(|e| ProbeFailure::Network(format!("invalid server name: {e}")))?;

    let sock = connect(target, settings).await?;
    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = match tokio::time::timeout(
        settings.handshake_timeout,
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            trace!("{} {version} handshake: {e}", target.address);
            return Err(classify_handshake_error(&e));
        }
        Err(_) => return Err(ProbeFailure::Timeout),
    };

    let connection = tls_stream.get_ref().1;
    if connection.protocol_version() != Some(protocol_version(version).version) {
        return Err(ProbeFailure::NotOffered);
    }

    let suite = connection
        .negotiated_cipher_suite()
        .ok_or_else(|| ProbeFailure::Network("no cipher suite negotiated".to_string()))?;
    let cipher = suites::describe(u16::from(suite.suite()));

    let ephemeral_key = connection
        .negotiated_key_exchange_group()
        .map(|group| group_key_info(u16::from(group.name())));

    let certificates = connection
        .peer_certificates()
        .map(|chain| chain.iter().map(|der| der.as_ref().to_vec()).collect())
        .unwrap_or_default();

    let observation = verifier.observation();

    Ok(Negotiated {
        cipher,
        ephemeral_key,
        certificates,
        facts: HandshakeFacts {
            trusted: observation.trusted,
            trust_error: observation.trust_error,
            ocsp_stapled: observation.ocsp_stapled,
            ..HandshakeFacts::default()
        },
    })
}

/// Maps a failed rustls handshake. Anything the peer said or did at the
/// protocol level means the version is not on offer.
fn classify_handshake_error(error: &std::io::Error) -> ProbeFailure {
    let tls_error = error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<RustlsError>());

    match tls_error {
        Some(
            RustlsError::AlertReceived(_)
            | RustlsError::PeerIncompatible(_)
            | RustlsError::PeerMisbehaved(_)
            | RustlsError::InvalidMessage(_)
            | RustlsError::InappropriateMessage { .. }
            | RustlsError::InappropriateHandshakeMessage { .. },
        ) => ProbeFailure::NotOffered,
        Some(other) => ProbeFailure::Network(other.to_string()),
        None => classify_io(error),
    }
}
