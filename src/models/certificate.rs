//! Evaluated certificate record.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Certificate facts derived from the leaf of the first successful probe.
///
/// `days_remaining` is computed against the evaluation-time clock, so two
/// evaluations of the same DER at different times may differ in that field
/// (and only in that field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub subject: String,
    pub issuer: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub serial_number: String,
    /// SHA-1 fingerprint, colon-separated upper-case hex.
    pub fingerprint: String,
    /// SHA-256 fingerprint, colon-separated upper-case hex.
    pub fingerprint256: String,
    pub subject_alt_names: Vec<String>,
    /// Public key size in bits; `None` when the key type could not be parsed.
    pub key_size: Option<u32>,
    pub public_key_algorithm: String,
    pub signature_algorithm: String,
    /// Whole days until `valid_to`; negative once expired.
    pub days_remaining: i64,
    /// Whole days between `valid_from` and `valid_to`.
    pub validity_period: i64,
    pub chain_length: usize,
    /// Subjects of the intermediates presented after the leaf.
    pub issuer_chain: Vec<String>,
    pub self_signed: bool,
    /// Trust verdict against the bundled webpki roots, when measured.
    pub trusted: Option<bool>,
}

impl CertificateRecord {
    pub fn is_expired(&self) -> bool {
        self.days_remaining < 0
    }
}
