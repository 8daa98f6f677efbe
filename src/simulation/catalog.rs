//! Client profile catalog.

use std::path::Path;

use serde::Deserialize;

use crate::error_handling::InitializationError;
use crate::models::TlsVersion;

/// A named client and the protocol version it would negotiate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    pub protocol: TlsVersion,
}

impl ClientProfile {
    pub fn new(name: impl Into<String>, protocol: TlsVersion) -> Self {
        Self {
            name: name.into(),
            protocol,
        }
    }
}

/// Immutable list of client profiles, injected into the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCatalog {
    profiles: Vec<ClientProfile>,
}

const BUILTIN_PROFILES: [(&str, TlsVersion); 14] = [
    ("Android 4.4.2", TlsVersion::Tls12),
    ("Android 7.0", TlsVersion::Tls12),
    ("Android 10.0", TlsVersion::Tls13),
    ("Chrome 49 / XP SP3", TlsVersion::Tls12),
    ("Chrome 109 / Win 10", TlsVersion::Tls13),
    ("Firefox 115 / Win 10", TlsVersion::Tls13),
    ("Edge 15 / Win 10", TlsVersion::Tls12),
    ("IE 8 / XP", TlsVersion::Tls10),
    ("IE 11 / Win 7", TlsVersion::Tls12),
    ("Safari 6 / iOS 6.0.1", TlsVersion::Tls12),
    ("Safari 16 / iOS 16", TlsVersion::Tls13),
    ("Java 6u45", TlsVersion::Tls10),
    ("Java 8u161", TlsVersion::Tls12),
    ("OpenSSL 3.0", TlsVersion::Tls13),
];

impl ClientCatalog {
    pub fn new(profiles: Vec<ClientProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[ClientProfile] {
        &self.profiles
    }

    /// Parses a JSON array of `{ "name": .., "protocol": .. }` objects.
    pub fn from_json_str(json: &str) -> Result<Self, InitializationError> {
        let profiles: Vec<ClientProfile> = serde_json::from_str(json)
            .map_err(|e| InitializationError::CatalogError(format!("invalid catalog: {e}")))?;
        if profiles.is_empty() {
            return Err(InitializationError::CatalogError(
                "catalog has no profiles".to_string(),
            ));
        }
        Ok(Self::new(profiles))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, InitializationError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            InitializationError::CatalogError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for ClientCatalog {
    fn default() -> Self {
        Self::new(
            BUILTIN_PROFILES
                .iter()
                .map(|(name, protocol)| ClientProfile::new(*name, *protocol))
                .collect(),
        )
    }
}
