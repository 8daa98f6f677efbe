//! Client handshake simulation.
//!
//! Joins a [`ClientCatalog`] against the probe results already gathered. No
//! connection is opened here: each profile simply reports what its protocol
//! version's probe observed.

mod catalog;

use serde::Serialize;

use crate::models::{EphemeralKeyInfo, ProtocolProbeResult, TlsVersion};

pub use catalog::{ClientCatalog, ClientProfile};

/// Reason reported for a profile whose version the server rejected.
pub const PROTOCOL_NOT_SUPPORTED: &str = "protocol not supported";

/// Simulated outcome for one client profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeResult {
    pub client: String,
    pub expected_protocol: TlsVersion,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TlsVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_exchange: Option<EphemeralKeyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One result per catalog entry, in catalog order. The cipher and key exchange
/// are the ones actually observed for the profile's version.
pub fn simulate(catalog: &ClientCatalog, results: &[ProtocolProbeResult]) -> Vec<HandshakeResult> {
    catalog
        .profiles()
        .iter()
        .map(|profile| {
            let observed = results
                .iter()
                .find(|r| r.version == profile.protocol && r.supported);
            match observed {
                Some(result) => HandshakeResult {
                    client: profile.name.clone(),
                    expected_protocol: profile.protocol,
                    success: true,
                    protocol: Some(result.version),
                    cipher: result.cipher.as_ref().map(|c| c.name.clone()),
                    key_exchange: result.ephemeral_key.clone(),
                    error: None,
                },
                None => HandshakeResult {
                    client: profile.name.clone(),
                    expected_protocol: profile.protocol,
                    success: false,
                    protocol: None,
                    cipher: None,
                    key_exchange: None,
                    error: Some(PROTOCOL_NOT_SUPPORTED.to_string()),
                },
            }
        })
        .collect()
}
