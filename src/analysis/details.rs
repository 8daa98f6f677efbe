//! Supplementary protocol flags.

use crate::models::HandshakeFacts;
use crate::security::HstsStatus;

use super::types::ProtocolDetails;

/// Combines per-handshake observations: any positive wins, otherwise any
/// negative, otherwise unmeasured.
fn merge_flag<'a>(facts: impl Iterator<Item = &'a HandshakeFacts>, pick: fn(&HandshakeFacts) -> Option<bool>) -> Option<bool> {
    facts.fold(None, |acc, fact| match (acc, pick(fact)) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), _) | (_, Some(false)) => Some(false),
        _ => None,
    })
}

/// Builds the protocol details block from every handshake performed during
/// the evaluation (version probes and cipher enumeration alike).
pub fn protocol_details(facts: &[&HandshakeFacts], hsts: &HstsStatus) -> ProtocolDetails {
    let (hsts_flag, max_age, include_subdomains, preload) = match hsts {
        HstsStatus::NotChecked => (None, None, None, None),
        HstsStatus::Missing => (Some(false), None, None, None),
        HstsStatus::Present(policy) => (
            Some(true),
            Some(policy.max_age),
            Some(policy.include_subdomains),
            Some(policy.preload),
        ),
    };

    ProtocolDetails {
        ocsp_stapling: merge_flag(facts.iter().copied(), |f| f.ocsp_stapled),
        secure_renegotiation: merge_flag(facts.iter().copied(), |f| f.secure_renegotiation),
        heartbeat: merge_flag(facts.iter().copied(), |f| f.heartbeat),
        compression: false,
        hsts: hsts_flag,
        hsts_max_age: max_age,
        hsts_include_subdomains: include_subdomains,
        hsts_preload: preload,
    }
}
