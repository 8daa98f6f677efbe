//! Report assembly.
//!
//! Everything after the network phase is a pure function of what the probes
//! gathered, so it lives here and is tested without sockets.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};

use crate::analysis::{analyze_cipher, analyze_protocols, build_recommendations, protocol_details};
use crate::certificate;
use crate::domain::TargetHost;
use crate::error_handling::{AnalysisError, CertificateError};
use crate::grading::grade;
use crate::models::{
    AnalysisReport, CipherDescriptor, HandshakeFacts, ProbeFailure, ProtocolProbeResult,
};
use crate::security::HstsStatus;
use crate::simulation::{simulate, ClientCatalog};
use crate::tls::Enumeration;

/// Everything the network phase produced.
pub(crate) struct Gathered {
    pub address: SocketAddr,
    /// One result per version, in version order.
    pub results: Vec<ProtocolProbeResult>,
    pub enumeration: Enumeration,
    pub hsts: HstsStatus,
}

/// Fails unless at least one version was negotiated.
///
/// A server that answered but refused every version yields
/// `MissingCertificate`; no answer at all (refused, network error, timeout)
/// yields `Unreachable`.
pub(crate) fn require_reachable(
    target: &TargetHost,
    results: &[ProtocolProbeResult],
) -> Result<(), AnalysisError> {
    if results.iter().any(|r| r.supported) {
        return Ok(());
    }

    let failures: Vec<&ProbeFailure> = results.iter().filter_map(|r| r.error.as_ref()).collect();
    if failures.iter().any(|f| **f == ProbeFailure::NotOffered) {
        return Err(AnalysisError::MissingCertificate(target.host().to_string()));
    }

    let message = failures
        .first()
        .map(|f| f.to_string())
        .unwrap_or_else(|| "no protocol version could be probed".to_string());
    Err(AnalysisError::Unreachable {
        host: target.host().to_string(),
        port: target.port(),
        message,
    })
}

/// Every cipher seen for the host: enumerated suites first, then whatever the
/// version probes negotiated. Deduplicated by identifier.
fn observed_ciphers(results: &[ProtocolProbeResult], enumeration: &Enumeration) -> Vec<CipherDescriptor> {
    let mut observed = enumeration.all_ciphers();
    for cipher in results.iter().filter_map(|r| r.cipher.as_ref()) {
        if !observed.iter().any(|c| c.id == cipher.id) {
            observed.push(cipher.clone());
        }
    }
    observed
}

/// Builds the report as of `now`.
pub(crate) fn build_report(
    target: &TargetHost,
    gathered: Gathered,
    catalog: &ClientCatalog,
    now: DateTime<Utc>,
) -> Result<AnalysisReport, AnalysisError> {
    let Gathered {
        address,
        results,
        enumeration,
        hsts,
    } = gathered;

    require_reachable(target, &results)?;

    // Newest version first: its chain is what current clients see.
    let source = results
        .iter()
        .rev()
        .find(|r| r.supported && !r.certificate_chain.is_empty())
        .ok_or_else(|| AnalysisError::MissingCertificate(target.host().to_string()))?;
    let trusted = source
        .facts
        .trusted
        .or_else(|| results.iter().find_map(|r| r.facts.trusted));
    let certificate = certificate::evaluate_at(&source.certificate_chain, trusted, now).map_err(
        |e| match e {
            CertificateError::Missing => AnalysisError::MissingCertificate(target.host().to_string()),
            CertificateError::Malformed(message) => AnalysisError::MalformedCertificate(message),
        },
    )?;

    let preferred = results
        .iter()
        .filter(|r| r.supported)
        .max_by_key(|r| r.version)
        .ok_or_else(|| AnalysisError::MissingCertificate(target.host().to_string()))?;
    let preferred_protocol = preferred.version;
    let negotiated = preferred
        .cipher
        .clone()
        .ok_or_else(|| anyhow!("{preferred_protocol} reported as supported without a cipher"))?;

    let observed = observed_ciphers(&results, &enumeration);
    let cipher_analysis = analyze_cipher(&negotiated, &observed);
    let protocol_analysis = analyze_protocols(&results);
    let grading = grade(&certificate, protocol_analysis.score, cipher_analysis.score)?;

    let facts: Vec<&HandshakeFacts> = results
        .iter()
        .map(|r| &r.facts)
        .chain(enumeration.facts.iter())
        .collect();
    let protocol_details = protocol_details(&facts, &hsts);
    let recommendations =
        build_recommendations(&grading, &protocol_analysis, &cipher_analysis, &protocol_details);
    let handshake_simulations = simulate(catalog, &results);

    let tls_versions: BTreeMap<_, _> = results.into_iter().map(|r| (r.version, r)).collect();

    Ok(AnalysisReport {
        domain: target.host().to_string(),
        port: target.port(),
        resolved_address: address.ip().to_string(),
        certificate,
        tls_versions,
        preferred_protocol,
        supported_ciphers: enumeration.accepted,
        cipher_analysis,
        protocol_analysis,
        protocol_details,
        handshake_simulations,
        grading,
        recommendations,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Grade, TlsVersion};
    use crate::simulation::ClientProfile;
    use crate::tls::suites;

    fn self_signed_der() -> Vec<u8> {
        let cert = rcgen::generate_simple_self_signed(vec!["example.com".to_string()])
            .expect("generate certificate");
        cert.cert.der().to_vec()
    }

    fn target() -> TargetHost {
        TargetHost::parse("example.com").unwrap()
    }

    fn supported(version: TlsVersion, suite: u16, chain: Vec<Vec<u8>>) -> ProtocolProbeResult {
        ProtocolProbeResult::supported(
            version,
            suites::describe(suite),
            None,
            chain,
            HandshakeFacts {
                trusted: Some(false),
                ocsp_stapled: Some(false),
                ..Default::default()
            },
            5,
        )
    }

    fn gathered(results: Vec<ProtocolProbeResult>) -> Gathered {
        Gathered {
            address: "127.0.0.1:443".parse().unwrap(),
            results,
            enumeration: Enumeration::default(),
            hsts: HstsStatus::Missing,
        }
    }

    fn modern_only() -> Vec<ProtocolProbeResult> {
        let der = self_signed_der();
        vec![
            ProtocolProbeResult::unsupported(TlsVersion::Tls10, ProbeFailure::NotOffered, 1),
            ProtocolProbeResult::unsupported(TlsVersion::Tls11, ProbeFailure::NotOffered, 1),
            supported(TlsVersion::Tls12, 0xC02F, vec![der.clone()]),
            supported(TlsVersion::Tls13, 0x1302, vec![der]),
        ]
    }

    #[test]
    fn test_unreachable_when_nothing_answers() {
        let results: Vec<_> = TlsVersion::ALL
            .iter()
            .map(|v| ProtocolProbeResult::unsupported(*v, ProbeFailure::ConnectionRefused, 0))
            .collect();
        let err = require_reachable(&target(), &results).unwrap_err();
        match err {
            AnalysisError::Unreachable { message, port, .. } => {
                assert_eq!(message, "connection refused");
                assert_eq!(port, 443);
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[test]
    fn test_all_timeouts_is_unreachable() {
        let results: Vec<_> = TlsVersion::ALL
            .iter()
            .map(|v| ProtocolProbeResult::unsupported(*v, ProbeFailure::Timeout, 8000))
            .collect();
        assert!(matches!(
            require_reachable(&target(), &results),
            Err(AnalysisError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_refused_handshakes_are_missing_certificate() {
        let results: Vec<_> = TlsVersion::ALL
            .iter()
            .map(|v| ProtocolProbeResult::unsupported(*v, ProbeFailure::NotOffered, 2))
            .collect();
        let err = build_report(&target(), gathered(results), &ClientCatalog::default(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCertificate(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_supported_probe_without_chain_is_missing_certificate() {
        let results = vec![supported(TlsVersion::Tls12, 0xC02F, Vec::new())];
        let err = build_report(&target(), gathered(results), &ClientCatalog::default(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCertificate(_)));
    }

    #[test]
    fn test_garbage_certificate_is_internal_error() {
        let results = vec![supported(TlsVersion::Tls12, 0xC02F, vec![vec![1, 2, 3]])];
        let err = build_report(&target(), gathered(results), &ClientCatalog::default(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedCertificate(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_report_for_modern_host() {
        let catalog = ClientCatalog::new(vec![
            ClientProfile::new("Chrome 109 / Win 10", TlsVersion::Tls13),
            ClientProfile::new("IE 8 / XP", TlsVersion::Tls10),
        ]);
        let report = build_report(&target(), gathered(modern_only()), &catalog, Utc::now())
            .expect("report");

        assert_eq!(report.domain, "example.com");
        assert_eq!(report.resolved_address, "127.0.0.1");
        assert_eq!(report.preferred_protocol, TlsVersion::Tls13);
        assert_eq!(report.tls_versions.len(), 4);
        assert_eq!(report.cipher_analysis.details.name, "TLS_AES_256_GCM_SHA384");
        assert_eq!(report.protocol_analysis.score, 100);
        assert!(report.protocol_analysis.vulnerabilities.is_empty());
        assert_eq!(report.certificate.trusted, Some(false));
        assert_eq!(report.protocol_details.hsts, Some(false));
        assert!(report.handshake_simulations[0].success);
        assert!(!report.handshake_simulations[1].success);
        assert!(report.grading.score <= 100);
        assert_ne!(report.grading.grade, Grade::F);
        assert!(report
            .recommendations
            .windows(2)
            .all(|pair| pair[0].severity <= pair[1].severity));
    }

    #[test]
    fn test_report_serializes_version_keys() {
        let report = build_report(
            &target(),
            gathered(modern_only()),
            &ClientCatalog::default(),
            Utc::now(),
        )
        .expect("report");
        let json = serde_json::to_value(&report).expect("serialize");

        assert_eq!(json["tlsVersions"]["TLSv1"]["supported"], false);
        assert_eq!(json["tlsVersions"]["TLSv1"]["error"], "protocol not offered");
        assert_eq!(json["tlsVersions"]["TLSv1.3"]["supported"], true);
        assert_eq!(json["preferredProtocol"], "TLSv1.3");
        assert!(json["grading"]["score"].is_u64());
        assert!(json["tlsVersions"]["TLSv1.2"].get("certificateChain").is_none());
    }

    #[test]
    fn test_enumerated_ciphers_feed_observed_set() {
        let mut enumeration = Enumeration::default();
        enumeration.accepted.insert(
            TlsVersion::Tls12,
            vec![suites::describe(0xC030), suites::describe(0xCCA8)],
        );
        let observed = observed_ciphers(&modern_only(), &enumeration);
        let ids: Vec<u16> = observed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0xC030, 0xCCA8, 0xC02F, 0x1302]);
    }
}
