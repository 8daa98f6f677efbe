//! The evaluation report returned to callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{CipherAnalysis, ProtocolAnalysis, ProtocolDetails, Recommendation};
use crate::simulation::HandshakeResult;

use super::{CertificateRecord, CipherDescriptor, PostureGrade, ProtocolProbeResult, TlsVersion};

/// Complete result of one evaluation. Only produced when a certificate was
/// obtained; every other outcome is an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub domain: String,
    pub port: u16,
    pub resolved_address: String,
    pub certificate: CertificateRecord,
    /// One entry per probed version, supported or not.
    pub tls_versions: BTreeMap<TlsVersion, ProtocolProbeResult>,
    pub preferred_protocol: TlsVersion,
    /// Accepted suites per version, in server preference order. Empty when
    /// enumeration was disabled or ran out of time.
    pub supported_ciphers: BTreeMap<TlsVersion, Vec<CipherDescriptor>>,
    pub cipher_analysis: CipherAnalysis,
    pub protocol_analysis: ProtocolAnalysis,
    pub protocol_details: ProtocolDetails,
    pub handshake_simulations: Vec<HandshakeResult>,
    pub grading: PostureGrade,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
}
