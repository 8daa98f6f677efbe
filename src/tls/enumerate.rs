//! Cipher suite enumeration.
//!
//! For each supported version the full candidate list is offered, the suite
//! the server picks is recorded and removed, and the shrunken list is offered
//! again until the server refuses. This costs one handshake per accepted suite
//! plus one, and yields the suites in server preference order.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use log::debug;

use crate::config::AnalyzerSettings;
use crate::models::{CipherDescriptor, HandshakeFacts, TlsVersion};
use crate::tls::{legacy, suites, ProbeTarget};

/// Accepted suites per version, plus the extension facts from the first
/// successful enumeration handshake of each version.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub accepted: BTreeMap<TlsVersion, Vec<CipherDescriptor>>,
    pub facts: Vec<HandshakeFacts>,
}

impl Enumeration {
    /// Every accepted suite across versions, deduplicated by identifier.
    pub fn all_ciphers(&self) -> Vec<CipherDescriptor> {
        let mut seen = Vec::new();
        for cipher in self.accepted.values().flatten() {
            if !seen.iter().any(|c: &CipherDescriptor| c.id == cipher.id) {
                seen.push(cipher.clone());
            }
        }
        seen
    }
}

/// Enumerates accepted suites for `versions`, several versions at a time.
pub async fn enumerate_ciphers(
    target: &ProbeTarget,
    versions: &[TlsVersion],
    settings: &AnalyzerSettings,
) -> Enumeration {
    let per_version: Vec<(TlsVersion, Vec<CipherDescriptor>, Option<HandshakeFacts>)> =
        stream::iter(versions.iter().copied())
            .map(|version| enumerate_version(target, version, settings))
            .buffer_unordered(settings.enumeration_concurrency.max(1))
            .collect()
            .await;

    let mut enumeration = Enumeration::default();
    for (version, accepted, facts) in per_version {
        enumeration.accepted.insert(version, accepted);
        enumeration.facts.extend(facts);
    }
    enumeration
}

async fn enumerate_version(
    target: &ProbeTarget,
    version: TlsVersion,
    settings: &AnalyzerSettings,
) -> (TlsVersion, Vec<CipherDescriptor>, Option<HandshakeFacts>) {
    let mut remaining = suites::offered(version);
    let mut accepted = Vec::new();
    let mut facts = None;

    while !remaining.is_empty() {
        let flight = match legacy::handshake(target, version, &remaining, settings).await {
            Ok(flight) => flight,
            Err(failure) => {
                debug!(
                    "{} {version} enumeration stopped after {} suite(s): {failure}",
                    target.address,
                    accepted.len()
                );
                break;
            }
        };

        let chosen = flight.hello.cipher_suite;
        if !remaining.contains(&chosen) {
            debug!(
                "{} {version} picked unoffered suite 0x{chosen:04x}, stopping enumeration",
                target.address
            );
            break;
        }

        if facts.is_none() {
            facts = Some(legacy::negotiated(&flight, version).facts);
        }
        remaining.retain(|id| *id != chosen);
        accepted.push(suites::describe(chosen));
    }

    (version, accepted, facts)
}
