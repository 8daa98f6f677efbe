//! Protocol versions and per-version probe results.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::EnumIter;

/// TLS protocol versions the probe can pin a connection to.
///
/// Ordering follows protocol age, so `Tls10 < Tls13`. Serialized with the
/// OpenSSL-style identifiers (`TLSv1`, `TLSv1.1`, ...), which are also the
/// keys of the `tlsVersions` map in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize)]
pub enum TlsVersion {
    #[serde(rename = "TLSv1")]
    Tls10,
    #[serde(rename = "TLSv1.1")]
    Tls11,
    #[serde(rename = "TLSv1.2")]
    Tls12,
    #[serde(rename = "TLSv1.3")]
    Tls13,
}

impl TlsVersion {
    /// All versions, oldest first.
    pub const ALL: [TlsVersion; 4] = [
        TlsVersion::Tls10,
        TlsVersion::Tls11,
        TlsVersion::Tls12,
        TlsVersion::Tls13,
    ];

    /// Human-readable label ("TLS 1.2").
    pub fn label(self) -> &'static str {
        match self {
            TlsVersion::Tls10 => "TLS 1.0",
            TlsVersion::Tls11 => "TLS 1.1",
            TlsVersion::Tls12 => "TLS 1.2",
            TlsVersion::Tls13 => "TLS 1.3",
        }
    }

    /// Identifier used as a report map key ("TLSv1.2").
    pub fn id(self) -> &'static str {
        match self {
            TlsVersion::Tls10 => "TLSv1",
            TlsVersion::Tls11 => "TLSv1.1",
            TlsVersion::Tls12 => "TLSv1.2",
            TlsVersion::Tls13 => "TLSv1.3",
        }
    }

    /// Protocol version as it appears on the wire.
    pub fn wire_version(self) -> u16 {
        match self {
            TlsVersion::Tls10 => 0x0301,
            TlsVersion::Tls11 => 0x0302,
            TlsVersion::Tls12 => 0x0303,
            TlsVersion::Tls13 => 0x0304,
        }
    }

    pub fn from_wire(value: u16) -> Option<Self> {
        match value {
            0x0301 => Some(TlsVersion::Tls10),
            0x0302 => Some(TlsVersion::Tls11),
            0x0303 => Some(TlsVersion::Tls12),
            0x0304 => Some(TlsVersion::Tls13),
            _ => None,
        }
    }

    /// Parses "1.2", "tls1.2", "TLSv1.2", "TLS 1.2" and similar spellings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .to_ascii_lowercase()
            .replace([' ', '_'], "")
            .replace("tlsv", "")
            .replace("tls", "");
        match normalized.as_str() {
            "1" | "1.0" => Some(TlsVersion::Tls10),
            "1.1" => Some(TlsVersion::Tls11),
            "1.2" => Some(TlsVersion::Tls12),
            "1.3" => Some(TlsVersion::Tls13),
            _ => None,
        }
    }

    /// Versions below TLS 1.2 are deprecated (RFC 8996).
    pub fn is_deprecated(self) -> bool {
        self < TlsVersion::Tls12
    }
}

impl<'de> Deserialize<'de> for TlsVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TlsVersion::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown TLS version {raw:?}")))
    }
}

impl std::fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a probe did not produce a supported result.
///
/// A failed probe is an ordinary outcome: it records which versions the
/// server rejects. It is carried in [`ProtocolProbeResult::error`] rather
/// than propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The server answered but refused to negotiate this version.
    NotOffered,
    /// Connect or handshake did not finish within the probe budget.
    Timeout,
    /// TCP connection refused.
    ConnectionRefused,
    /// Any other transport error.
    Network(String),
}

impl ProbeFailure {
    /// True when the endpoint never gave a TLS-level answer: the connection
    /// was refused or nothing arrived within the budget. Retrying the same
    /// version another way cannot change these.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, ProbeFailure::ConnectionRefused | ProbeFailure::Timeout)
    }
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeFailure::NotOffered => f.write_str("protocol not offered"),
            ProbeFailure::Timeout => f.write_str("timeout"),
            ProbeFailure::ConnectionRefused => f.write_str("connection refused"),
            ProbeFailure::Network(message) => f.write_str(message),
        }
    }
}

impl Serialize for ProbeFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Negotiated (or enumerated) cipher suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CipherDescriptor {
    /// OpenSSL-style name, e.g. `ECDHE-RSA-AES128-GCM-SHA256`.
    pub name: String,
    /// IANA name, e.g. `TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256`.
    pub standard_name: String,
    /// Wire identifier.
    #[serde(serialize_with = "serialize_suite_id")]
    pub id: u16,
    /// Effective symmetric key strength in bits.
    pub bits: u16,
    pub aead: bool,
    pub forward_secrecy: bool,
}

fn serialize_suite_id<S: Serializer>(id: &u16, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("0x{id:04X}"))
}

/// Ephemeral key-exchange parameters observed during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EphemeralKeyInfo {
    /// "ECDH" or "DH".
    #[serde(rename = "type")]
    pub kind: String,
    /// Curve or group name when known (e.g. "X25519").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Key size in bits.
    pub size: u32,
}

/// Connection facts that feed the protocol details section but are not part
/// of the per-version result shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeFacts {
    /// Whether webpki roots would have accepted the chain (rustls probes only).
    pub trusted: Option<bool>,
    pub trust_error: Option<String>,
    /// Whether the server stapled an OCSP response (rustls probes only).
    pub ocsp_stapled: Option<bool>,
    /// renegotiation_info extension echoed in the ServerHello (raw probes only).
    pub secure_renegotiation: Option<bool>,
    /// heartbeat extension echoed in the ServerHello (raw probes only).
    pub heartbeat: Option<bool>,
}

/// Outcome of one probe against one protocol version.
///
/// Invariant: `supported == false` implies `cipher`, `ephemeral_key` and the
/// certificate chain are empty and `error` is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolProbeResult {
    pub version: TlsVersion,
    pub supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher: Option<CipherDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral_key: Option<EphemeralKeyInfo>,
    /// Wall-clock time from TCP connect to handshake completion or failure.
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProbeFailure>,
    /// Peer chain as DER, leaf first.
    #[serde(skip)]
    pub certificate_chain: Vec<Vec<u8>>,
    #[serde(skip)]
    pub facts: HandshakeFacts,
}

impl ProtocolProbeResult {
    pub fn supported(
        version: TlsVersion,
        cipher: CipherDescriptor,
        ephemeral_key: Option<EphemeralKeyInfo>,
        certificate_chain: Vec<Vec<u8>>,
        facts: HandshakeFacts,
        latency_ms: u64,
    ) -> Self {
        Self {
            version,
            supported: true,
            cipher: Some(cipher),
            ephemeral_key,
            latency_ms,
            error: None,
            certificate_chain,
            facts,
        }
    }

    pub fn unsupported(version: TlsVersion, failure: ProbeFailure, latency_ms: u64) -> Self {
        Self {
            version,
            supported: false,
            cipher: None,
            ephemeral_key: None,
            latency_ms,
            error: Some(failure),
            certificate_chain: Vec::new(),
            facts: HandshakeFacts::default(),
        }
    }
}
