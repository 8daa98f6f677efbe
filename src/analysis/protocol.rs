//! Protocol support scoring.

use crate::models::{CipherFinding, ProtocolProbeResult, Severity, TlsVersion};

use super::types::ProtocolAnalysis;

fn is_supported(results: &[ProtocolProbeResult], version: TlsVersion) -> bool {
    results
        .iter()
        .any(|result| result.version == version && result.supported)
}

/// Scores the support matrix.
///
/// Each rule deducts independently from 100 and the total is clamped. A
/// version missing from `results` counts as unsupported, so callers must pass
/// the complete matrix.
pub fn analyze_protocols(results: &[ProtocolProbeResult]) -> ProtocolAnalysis {
    let mut vulnerabilities = Vec::new();
    let mut warnings = Vec::new();
    let mut score: i32 = 100;

    for version in TlsVersion::ALL.into_iter().filter(|v| v.is_deprecated()) {
        if !is_supported(results, version) {
            continue;
        }
        let (deduction, detail) = match version {
            TlsVersion::Tls10 => (
                40,
                "TLS 1.0 is deprecated (RFC 8996) and exposed to BEAST (CVE-2011-3389) and POODLE-style downgrades (CVE-2014-8730).",
            ),
            _ => (30, "TLS 1.1 is deprecated (RFC 8996) and lacks modern AEAD suites."),
        };
        score -= deduction;
        vulnerabilities.push(CipherFinding::new(
            Severity::High,
            format!("{} enabled", version.label()),
            detail,
            format!("Disable {} in the server configuration.", version.label()),
        ));
    }

    if !is_supported(results, TlsVersion::Tls12) {
        score -= 50;
        vulnerabilities.push(CipherFinding::new(
            Severity::Critical,
            "TLS 1.2 not supported",
            "TLS 1.2 is the baseline most clients require.",
            "Enable TLS 1.2 with AEAD cipher suites.",
        ));
    }

    if !is_supported(results, TlsVersion::Tls13) {
        score -= 10;
        warnings.push(CipherFinding::new(
            Severity::Medium,
            "TLS 1.3 not supported",
            "TLS 1.3 removes legacy algorithms and shortens the handshake.",
            "Enable TLS 1.3.",
        ));
    }

    ProtocolAnalysis {
        vulnerabilities,
        warnings,
        score: score.clamp(0, 100) as u8,
    }
}
