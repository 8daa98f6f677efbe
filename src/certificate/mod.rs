//! Certificate evaluator.
//!
//! Turns the DER chain captured by a probe into a [`CertificateRecord`]. No
//! network access; the only impure input is the clock used for
//! `days_remaining`.

use chrono::{DateTime, TimeZone, Utc};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;
use x509_parser::time::ASN1Time;

use crate::error_handling::CertificateError;
use crate::models::CertificateRecord;

const SECONDS_PER_DAY: i64 = 86_400;

/// Evaluates the leaf of `chain` against the current time.
///
/// `trusted` is the webpki verdict observed during the handshake, if any.
/// Calling this twice on the same chain yields identical records except for
/// `days_remaining`, which tracks the clock.
pub fn evaluate(
    chain: &[Vec<u8>],
    trusted: Option<bool>,
) -> Result<CertificateRecord, CertificateError> {
    evaluate_at(chain, trusted, Utc::now())
}

/// Evaluates the leaf of `chain` as of `now`.
pub fn evaluate_at(
    chain: &[Vec<u8>],
    trusted: Option<bool>,
    now: DateTime<Utc>,
) -> Result<CertificateRecord, CertificateError> {
    let leaf_der = chain.first().ok_or(CertificateError::Missing)?;
    let (_, leaf) = X509Certificate::from_der(leaf_der)
        .map_err(|e| CertificateError::Malformed(format!("leaf certificate: {e}")))?;

    let valid_from = asn1_to_utc(&leaf.validity().not_before)?;
    let valid_to = asn1_to_utc(&leaf.validity().not_after)?;

    // Intermediates that fail to parse are skipped; only the leaf is mandatory.
    let issuer_chain = chain
        .iter()
        .skip(1)
        .filter_map(|der| X509Certificate::from_der(der).ok())
        .map(|(_, cert)| cert.subject().to_string())
        .collect();

    let (public_key_algorithm, key_size) = public_key_info(&leaf);

    Ok(CertificateRecord {
        subject: leaf.subject().to_string(),
        issuer: leaf.issuer().to_string(),
        valid_from,
        valid_to,
        serial_number: hex_upper(leaf.raw_serial(), ""),
        fingerprint: hex_upper(&Sha1::digest(leaf_der), ":"),
        fingerprint256: hex_upper(&Sha256::digest(leaf_der), ":"),
        subject_alt_names: subject_alt_names(&leaf),
        key_size,
        public_key_algorithm,
        signature_algorithm: signature_name(&leaf.signature_algorithm.algorithm.to_id_string()),
        days_remaining: days_between(now, valid_to),
        validity_period: days_between(valid_from, valid_to),
        chain_length: chain.len(),
        issuer_chain,
        self_signed: leaf.subject().as_raw() == leaf.issuer().as_raw(),
        trusted,
    })
}

/// Whole days from `from` to `to`, rounded toward negative infinity.
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn asn1_to_utc(time: &ASN1Time) -> Result<DateTime<Utc>, CertificateError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| CertificateError::Malformed("validity timestamp out of range".to_string()))
}

fn hex_upper(bytes: &[u8], separator: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// DNS and IP entries of the SubjectAltName extension, in certificate order.
fn subject_alt_names(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut sans = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                match general_name {
                    GeneralName::DNSName(dns_name) => sans.push(dns_name.to_string()),
                    GeneralName::IPAddress(bytes) => {
                        if let Some(ip) = ip_from_bytes(bytes) {
                            sans.push(ip.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    sans
}

fn ip_from_bytes(bytes: &[u8]) -> Option<std::net::IpAddr> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(std::net::IpAddr::from),
        16 => <[u8; 16]>::try_from(bytes).ok().map(std::net::IpAddr::from),
        _ => None,
    }
}

/// Key algorithm label and size in bits. Size is `None` for key types we
/// cannot measure, which grading treats as missing input.
fn public_key_info(cert: &X509Certificate<'_>) -> (String, Option<u32>) {
    let spki = cert.public_key();
    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => ("RSA".to_string(), u32::try_from(rsa.key_size()).ok()),
        Ok(PublicKey::EC(ec)) => ("EC".to_string(), u32::try_from(ec.key_size()).ok()),
        // Y is below P, so its byte length stands in for the modulus size.
        Ok(PublicKey::DSA(y)) => {
            let bytes = y.iter().skip_while(|b| **b == 0).count();
            ("DSA".to_string(), u32::try_from(bytes * 8).ok())
        }
        _ => match spki.algorithm.algorithm.to_id_string().as_str() {
            "1.3.101.112" => ("Ed25519".to_string(), Some(256)),
            "1.3.101.113" => ("Ed448".to_string(), Some(448)),
            oid => (oid.to_string(), None),
        },
    }
}

/// OpenSSL-style name for a signature algorithm OID.
fn signature_name(oid: &str) -> String {
    match oid {
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption",
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption",
        "1.2.840.113549.1.1.10" => "rsassaPss",
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption",
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption",
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption",
        "1.2.840.10045.4.1" => "ecdsa-with-SHA1",
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256",
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384",
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512",
        "1.3.101.112" => "ED25519",
        "1.3.101.113" => "ED448",
        other => return other.to_string(),
    }
    .to_string()
}
