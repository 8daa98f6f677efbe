//! Cipher suite registry.
//!
//! Maps wire identifiers to OpenSSL names, IANA names and effective key
//! strength. The table covers everything the raw probes offer plus the suites
//! rustls can negotiate.

use crate::models::{CipherDescriptor, TlsVersion};

/// One registered suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteInfo {
    pub id: u16,
    pub name: &'static str,
    pub standard_name: &'static str,
    pub bits: u16,
}

const fn suite(id: u16, name: &'static str, standard_name: &'static str, bits: u16) -> SuiteInfo {
    SuiteInfo {
        id,
        name,
        standard_name,
        bits,
    }
}

/// TLS 1.3 suites. The OpenSSL and IANA names coincide.
const TLS13_SUITES: [SuiteInfo; 5] = [
    suite(0x1301, "TLS_AES_128_GCM_SHA256", "TLS_AES_128_GCM_SHA256", 128),
    suite(0x1302, "TLS_AES_256_GCM_SHA384", "TLS_AES_256_GCM_SHA384", 256),
    suite(0x1303, "TLS_CHACHA20_POLY1305_SHA256", "TLS_CHACHA20_POLY1305_SHA256", 256),
    suite(0x1304, "TLS_AES_128_CCM_SHA256", "TLS_AES_128_CCM_SHA256", 128),
    suite(0x1305, "TLS_AES_128_CCM_8_SHA256", "TLS_AES_128_CCM_8_SHA256", 128),
];

/// Pre-1.3 suites, in the order a legacy probe offers them (strongest first).
const LEGACY_SUITES: [SuiteInfo; 47] = [
    suite(0xC02C, "ECDHE-ECDSA-AES256-GCM-SHA384", "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384", 256),
    suite(0xC030, "ECDHE-RSA-AES256-GCM-SHA384", "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384", 256),
    suite(0xCCA9, "ECDHE-ECDSA-CHACHA20-POLY1305", "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256", 256),
    suite(0xCCA8, "ECDHE-RSA-CHACHA20-POLY1305", "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256", 256),
    suite(0xC02B, "ECDHE-ECDSA-AES128-GCM-SHA256", "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256", 128),
    suite(0xC02F, "ECDHE-RSA-AES128-GCM-SHA256", "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256", 128),
    suite(0x009F, "DHE-RSA-AES256-GCM-SHA384", "TLS_DHE_RSA_WITH_AES_256_GCM_SHA384", 256),
    suite(0xCCAA, "DHE-RSA-CHACHA20-POLY1305", "TLS_DHE_RSA_WITH_CHACHA20_POLY1305_SHA256", 256),
    suite(0x009E, "DHE-RSA-AES128-GCM-SHA256", "TLS_DHE_RSA_WITH_AES_128_GCM_SHA256", 128),
    suite(0xC024, "ECDHE-ECDSA-AES256-SHA384", "TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384", 256),
    suite(0xC028, "ECDHE-RSA-AES256-SHA384", "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384", 256),
    suite(0xC023, "ECDHE-ECDSA-AES128-SHA256", "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256", 128),
    suite(0xC027, "ECDHE-RSA-AES128-SHA256", "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256", 128),
    suite(0x006B, "DHE-RSA-AES256-SHA256", "TLS_DHE_RSA_WITH_AES_256_CBC_SHA256", 256),
    suite(0x0067, "DHE-RSA-AES128-SHA256", "TLS_DHE_RSA_WITH_AES_128_CBC_SHA256", 128),
    suite(0xC00A, "ECDHE-ECDSA-AES256-SHA", "TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA", 256),
    suite(0xC014, "ECDHE-RSA-AES256-SHA", "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA", 256),
    suite(0xC009, "ECDHE-ECDSA-AES128-SHA", "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA", 128),
    suite(0xC013, "ECDHE-RSA-AES128-SHA", "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA", 128),
    suite(0x0039, "DHE-RSA-AES256-SHA", "TLS_DHE_RSA_WITH_AES_256_CBC_SHA", 256),
    suite(0x0033, "DHE-RSA-AES128-SHA", "TLS_DHE_RSA_WITH_AES_128_CBC_SHA", 128),
    suite(0x0088, "DHE-RSA-CAMELLIA256-SHA", "TLS_DHE_RSA_WITH_CAMELLIA_256_CBC_SHA", 256),
    suite(0x0045, "DHE-RSA-CAMELLIA128-SHA", "TLS_DHE_RSA_WITH_CAMELLIA_128_CBC_SHA", 128),
    suite(0x009D, "AES256-GCM-SHA384", "TLS_RSA_WITH_AES_256_GCM_SHA384", 256),
    suite(0x009C, "AES128-GCM-SHA256", "TLS_RSA_WITH_AES_128_GCM_SHA256", 128),
    suite(0x003D, "AES256-SHA256", "TLS_RSA_WITH_AES_256_CBC_SHA256", 256),
    suite(0x003C, "AES128-SHA256", "TLS_RSA_WITH_AES_128_CBC_SHA256", 128),
    suite(0x0035, "AES256-SHA", "TLS_RSA_WITH_AES_256_CBC_SHA", 256),
    suite(0x002F, "AES128-SHA", "TLS_RSA_WITH_AES_128_CBC_SHA", 128),
    suite(0x0084, "CAMELLIA256-SHA", "TLS_RSA_WITH_CAMELLIA_256_CBC_SHA", 256),
    suite(0x0041, "CAMELLIA128-SHA", "TLS_RSA_WITH_CAMELLIA_128_CBC_SHA", 128),
    suite(0xC008, "ECDHE-ECDSA-DES-CBC3-SHA", "TLS_ECDHE_ECDSA_WITH_3DES_EDE_CBC_SHA", 112),
    suite(0xC012, "ECDHE-RSA-DES-CBC3-SHA", "TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA", 112),
    suite(0x0016, "EDH-RSA-DES-CBC3-SHA", "TLS_DHE_RSA_WITH_3DES_EDE_CBC_SHA", 112),
    suite(0x000A, "DES-CBC3-SHA", "TLS_RSA_WITH_3DES_EDE_CBC_SHA", 112),
    suite(0xC007, "ECDHE-ECDSA-RC4-SHA", "TLS_ECDHE_ECDSA_WITH_RC4_128_SHA", 128),
    suite(0xC011, "ECDHE-RSA-RC4-SHA", "TLS_ECDHE_RSA_WITH_RC4_128_SHA", 128),
    suite(0x0005, "RC4-SHA", "TLS_RSA_WITH_RC4_128_SHA", 128),
    suite(0x0004, "RC4-MD5", "TLS_RSA_WITH_RC4_128_MD5", 128),
    suite(0x0015, "EDH-RSA-DES-CBC-SHA", "TLS_DHE_RSA_WITH_DES_CBC_SHA", 56),
    suite(0x0009, "DES-CBC-SHA", "TLS_RSA_WITH_DES_CBC_SHA", 56),
    suite(0x0008, "EXP-DES-CBC-SHA", "TLS_RSA_EXPORT_WITH_DES40_CBC_SHA", 40),
    suite(0x0003, "EXP-RC4-MD5", "TLS_RSA_EXPORT_WITH_RC4_40_MD5", 40),
    suite(0x0034, "ADH-AES128-SHA", "TLS_DH_anon_WITH_AES_128_CBC_SHA", 128),
    suite(0xC018, "AECDH-AES128-SHA", "TLS_ECDH_anon_WITH_AES_128_CBC_SHA", 128),
    suite(0x0002, "NULL-SHA", "TLS_RSA_WITH_NULL_SHA", 0),
    suite(0x0001, "NULL-MD5", "TLS_RSA_WITH_NULL_MD5", 0),
];

/// Looks up a suite by wire identifier.
pub fn lookup(id: u16) -> Option<&'static SuiteInfo> {
    TLS13_SUITES
        .iter()
        .chain(LEGACY_SUITES.iter())
        .find(|suite| suite.id == id)
}

/// Descriptor for a negotiated suite. Unregistered identifiers keep their
/// hex code as the name and report zero bits, which the scorer treats as
/// weak rather than silently passing.
pub fn describe(id: u16) -> CipherDescriptor {
    match lookup(id) {
        Some(suite) => CipherDescriptor::classified(id, suite.name, suite.standard_name, suite.bits),
        None => {
            let name = format!("UNKNOWN-0x{id:04X}");
            CipherDescriptor::classified(id, &name, &name, 0)
        }
    }
}

/// Suites offered when probing `version` with a raw ClientHello.
pub fn offered(version: TlsVersion) -> Vec<u16> {
    match version {
        TlsVersion::Tls13 => TLS13_SUITES.iter().map(|s| s.id).collect(),
        // AEAD and SHA-2 suites do not exist before TLS 1.2.
        TlsVersion::Tls10 | TlsVersion::Tls11 => LEGACY_SUITES
            .iter()
            .filter(|s| !is_tls12_only(s))
            .map(|s| s.id)
            .collect(),
        TlsVersion::Tls12 => LEGACY_SUITES.iter().map(|s| s.id).collect(),
    }
}

fn is_tls12_only(suite: &SuiteInfo) -> bool {
    suite.name.contains("GCM")
        || suite.name.contains("POLY1305")
        || suite.name.ends_with("SHA256")
        || suite.name.ends_with("SHA384")
}
