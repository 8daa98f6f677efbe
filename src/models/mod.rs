//! Request-scoped value objects shared by the probe, analyzers and grading engine.
//!
//! Nothing in here holds a connection or mutable shared state: every type is
//! created during one evaluation and dropped once the report is serialized.

mod certificate;
mod findings;
mod protocol;
mod report;

pub use certificate::CertificateRecord;
pub use findings::{CipherFinding, Grade, PostureGrade, SecurityLevel, Severity};
pub use protocol::{
    CipherDescriptor, EphemeralKeyInfo, HandshakeFacts, ProbeFailure, ProtocolProbeResult,
    TlsVersion,
};
pub use report::AnalysisReport;
