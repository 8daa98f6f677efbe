//! Analyzer output types.

use serde::Serialize;

use crate::models::{CipherFinding, Grade, Severity};

/// Result of scoring the negotiated cipher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherAnalysis {
    pub rating: Grade,
    pub score: u8,
    pub issues: Vec<CipherFinding>,
    pub warnings: Vec<CipherFinding>,
    pub details: CipherDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CipherDetails {
    pub name: String,
    pub standard_name: String,
    pub bits: u16,
    pub aead: bool,
    pub forward_secrecy: bool,
    pub cbc: bool,
    pub supports_chacha: bool,
}

/// Result of scoring the protocol support matrix.
///
/// `warnings` never contains vulnerabilities and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolAnalysis {
    pub vulnerabilities: Vec<CipherFinding>,
    pub warnings: Vec<CipherFinding>,
    pub score: u8,
}

/// Supplementary connection flags. `None` means "not measured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDetails {
    pub ocsp_stapling: Option<bool>,
    pub secure_renegotiation: Option<bool>,
    pub heartbeat: Option<bool>,
    /// Always false: probes only offer the null compression method.
    pub compression: bool,
    pub hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub hsts_preload: Option<bool>,
}

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Certificate,
    Protocol,
    Cipher,
    Configuration,
}

/// One entry of the flattened, prioritized recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub category: FindingCategory,
    pub issue: String,
    pub recommendation: String,
}
