//! Raw-handshake probes for versions and suites rustls cannot negotiate.

use log::trace;

use crate::analysis::CipherProperties;
use crate::config::AnalyzerSettings;
use crate::models::{HandshakeFacts, ProbeFailure, TlsVersion};
use crate::tls::handshake::{
    exchange, group_key_info, parse_server_key_exchange, ClientHelloBuilder, FlightError,
    ServerFlight, EXT_HEARTBEAT, EXT_RENEGOTIATION_INFO,
};
use crate::tls::{classify_io, connect, suites, Negotiated, ProbeTarget};

/// Offers `version` with the full legacy suite list.
pub(crate) async fn probe(
    target: &ProbeTarget,
    version: TlsVersion,
    settings: &AnalyzerSettings,
) -> Result<Negotiated, ProbeFailure> {
    let flight = handshake(target, version, &suites::offered(version), settings).await?;
    Ok(negotiated(&flight, version))
}

/// Sends one ClientHello offering `cipher_suites` and reads the reply.
pub(crate) async fn handshake(
    target: &ProbeTarget,
    version: TlsVersion,
    cipher_suites: &[u16],
    settings: &AnalyzerSettings,
) -> Result<ServerFlight, ProbeFailure> {
    let mut stream = connect(target, settings).await?;
    let hello = ClientHelloBuilder::new(version)
        .ciphers(cipher_suites)
        .server_name(target.sni.as_deref())
        .default_extensions()
        .build();

    match tokio::time::timeout(settings.handshake_timeout, exchange(&mut stream, &hello, version)).await {
        Ok(Ok(flight)) => Ok(flight),
        Ok(Err(e)) => {
            trace!("{} {version} raw handshake: {e}", target.address);
            Err(classify_flight(e))
        }
        Err(_) => Err(ProbeFailure::Timeout),
    }
}

fn classify_flight(error: FlightError) -> ProbeFailure {
    match error {
        FlightError::Alert { .. } | FlightError::Closed | FlightError::VersionMismatch(_) => {
            ProbeFailure::NotOffered
        }
        FlightError::Malformed(_) => ProbeFailure::Network(error.to_string()),
        FlightError::Io(e) => classify_io(&e),
    }
}

/// Extracts cipher, ephemeral key and extension facts from a server flight.
pub(crate) fn negotiated(flight: &ServerFlight, version: TlsVersion) -> Negotiated {
    let cipher = suites::describe(flight.hello.cipher_suite);

    let ephemeral_key = if version == TlsVersion::Tls13 {
        flight.hello.key_share_group().map(group_key_info)
    } else {
        let properties = CipherProperties::classify(&cipher.name, cipher.bits);
        if properties.has_ecdhe || properties.has_dhe {
            flight
                .key_exchange
                .as_deref()
                .and_then(|body| parse_server_key_exchange(body, properties.has_ecdhe))
        } else {
            None
        }
    };

    // Renegotiation and heartbeat are meaningless in TLS 1.3.
    let facts = if version == TlsVersion::Tls13 {
        HandshakeFacts::default()
    } else {
        HandshakeFacts {
            secure_renegotiation: Some(flight.hello.has_extension(EXT_RENEGOTIATION_INFO)),
            heartbeat: Some(flight.hello.has_extension(EXT_HEARTBEAT)),
            ..HandshakeFacts::default()
        }
    };

    Negotiated {
        cipher,
        ephemeral_key,
        certificates: flight.certificates.clone(),
        facts,
    }
}
