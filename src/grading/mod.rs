//! Grading engine.
//!
//! Combines certificate health with the protocol and cipher scores into one
//! composite grade. Deductions are applied in a fixed order, each to the
//! already-reduced score:
//!
//! 1. expired certificate: score drops to 0
//! 2. fewer than 7 days left: -30, otherwise fewer than 30 days left: -15
//! 3. weak key (RSA or DSA under 2048 bits, EC under 224 bits): -20
//! 4. protocol: -(100 - protocol score) * 0.4
//! 5. cipher: -(100 - cipher score) * 0.3
//!
//! Certificate problems are flat point deductions while protocol and cipher
//! are weighted; the two shapes are kept as they are.

use crate::error_handling::GradingError;
use crate::models::{CertificateRecord, CipherFinding, Grade, PostureGrade, SecurityLevel, Severity};

const MIN_FACTORING_KEY_BITS: u32 = 2048;
const MIN_EC_KEY_BITS: u32 = 224;
const PROTOCOL_WEIGHT: f64 = 0.4;
const CIPHER_WEIGHT: f64 = 0.3;

/// Smallest acceptable key for `algorithm`, or `None` when no size makes
/// the algorithm weak. Both thresholds sit at 112-bit security.
fn min_key_bits(algorithm: &str) -> Option<u32> {
    match algorithm {
        "RSA" | "DSA" => Some(MIN_FACTORING_KEY_BITS),
        "EC" => Some(MIN_EC_KEY_BITS),
        "Ed25519" | "Ed448" => None,
        // Unrecognized algorithms are held to the RSA bar.
        _ => Some(MIN_FACTORING_KEY_BITS),
    }
}

fn check_score(field: &'static str, value: u8) -> Result<f64, GradingError> {
    if value > 100 {
        return Err(GradingError::ScoreOutOfRange {
            field,
            value: u16::from(value),
        });
    }
    Ok(f64::from(value))
}

/// Computes the posture grade.
///
/// Deterministic for a given certificate record; `days_remaining` is the only
/// time-dependent input and is fixed when the record is built.
///
/// # Errors
///
/// Returns [`GradingError::MissingField`] when the certificate key size is
/// unknown and [`GradingError::ScoreOutOfRange`] for component scores above 100.
pub fn grade(
    certificate: &CertificateRecord,
    protocol_score: u8,
    cipher_score: u8,
) -> Result<PostureGrade, GradingError> {
    let key_size = certificate
        .key_size
        .ok_or(GradingError::MissingField("keySize"))?;
    let protocol_score = check_score("protocolScore", protocol_score)?;
    let cipher_score = check_score("cipherScore", cipher_score)?;

    let mut score: f64 = 100.0;
    let mut issues = Vec::new();

    if certificate.is_expired() {
        score = 0.0;
        issues.push(CipherFinding::new(
            Severity::Critical,
            "CRITICAL: Certificate expired",
            format!("The certificate expired on {}.", certificate.valid_to.to_rfc3339()),
            "Renew the certificate immediately.",
        ));
    } else if certificate.days_remaining < 7 {
        score -= 30.0;
        issues.push(CipherFinding::new(
            Severity::High,
            "certificate expires in < 7 days",
            format!("The certificate expires in {} days.", certificate.days_remaining),
            "Renew the certificate now.",
        ));
    } else if certificate.days_remaining < 30 {
        score -= 15.0;
        issues.push(CipherFinding::new(
            Severity::Medium,
            "certificate expires soon",
            format!("The certificate expires in {} days.", certificate.days_remaining),
            "Schedule certificate renewal.",
        ));
    }

    let minimum = min_key_bits(&certificate.public_key_algorithm);
    if minimum.is_some_and(|bits| key_size < bits) {
        if score > 0.0 {
            score -= 20.0;
        }
        issues.push(CipherFinding::new(
            Severity::High,
            "weak key size",
            format!(
                "The certificate {} key is {key_size} bits.",
                certificate.public_key_algorithm
            ),
            "Reissue the certificate with an RSA key of at least 2048 bits or an ECDSA key.",
        ));
    }

    score -= (100.0 - protocol_score) * PROTOCOL_WEIGHT;
    score -= (100.0 - cipher_score) * CIPHER_WEIGHT;

    let score = score.round().clamp(0.0, 100.0) as u8;
    let grade = Grade::from_posture_score(score);

    Ok(PostureGrade {
        grade,
        score,
        issues,
        security_level: SecurityLevel::from(grade),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(days_remaining: i64, key_size: Option<u32>) -> CertificateRecord {
        keyed("RSA", days_remaining, key_size)
    }

    fn keyed(algorithm: &str, days_remaining: i64, key_size: Option<u32>) -> CertificateRecord {
        let valid_to = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        CertificateRecord {
            subject: "CN=example.com".into(),
            issuer: "CN=Example CA".into(),
            valid_from: valid_to - Duration::days(365),
            valid_to,
            serial_number: "01".into(),
            fingerprint: String::new(),
            fingerprint256: String::new(),
            subject_alt_names: vec!["example.com".into()],
            key_size,
            public_key_algorithm: algorithm.into(),
            signature_algorithm: "sha256WithRSAEncryption".into(),
            days_remaining,
            validity_period: 365,
            chain_length: 2,
            issuer_chain: vec!["CN=Example CA".into()],
            self_signed: false,
            trusted: Some(true),
        }
    }

    #[test]
    fn test_healthy_host_is_a_plus() {
        let grading = grade(&record(200, Some(2048)), 100, 100).unwrap();
        assert_eq!(grading.score, 100);
        assert_eq!(grading.grade, Grade::APlus);
        assert_eq!(grading.security_level, SecurityLevel::Excellent);
        assert!(grading.issues.is_empty());
    }

    #[test]
    fn test_expired_certificate_dominates() {
        let grading = grade(&record(-1, Some(4096)), 100, 100).unwrap();
        assert_eq!(grading.score, 0);
        assert_eq!(grading.grade, Grade::F);
        assert_eq!(grading.security_level, SecurityLevel::Poor);
        assert_eq!(grading.issues[0].issue, "CRITICAL: Certificate expired");
    }

    #[test]
    fn test_expiry_tiers() {
        let week = grade(&record(6, Some(2048)), 100, 100).unwrap();
        assert_eq!(week.score, 70);
        assert_eq!(week.issues[0].issue, "certificate expires in < 7 days");

        let month = grade(&record(7, Some(2048)), 100, 100).unwrap();
        assert_eq!(month.score, 85);
        assert_eq!(month.issues[0].issue, "certificate expires soon");

        let fine = grade(&record(30, Some(2048)), 100, 100).unwrap();
        assert_eq!(fine.score, 100);
    }

    #[test]
    fn test_sequential_deductions() {
        // 100 - 15 - 20 - 50*0.4 - 40*0.3 = 33
        let grading = grade(&record(20, Some(1024)), 50, 60).unwrap();
        assert_eq!(grading.score, 33);
        assert_eq!(grading.grade, Grade::E);
        let issues: Vec<&str> = grading.issues.iter().map(|f| f.issue.as_str()).collect();
        assert_eq!(issues, vec!["certificate expires soon", "weak key size"]);
    }

    #[test]
    fn test_key_size_threshold_depends_on_algorithm() {
        let p256 = grade(&keyed("EC", 200, Some(256)), 100, 100).unwrap();
        assert_eq!(p256.score, 100);
        assert!(p256.issues.is_empty());

        let p192 = grade(&keyed("EC", 200, Some(192)), 100, 100).unwrap();
        assert_eq!(p192.score, 80);
        assert_eq!(p192.issues[0].issue, "weak key size");

        let ed25519 = grade(&keyed("Ed25519", 200, Some(256)), 100, 100).unwrap();
        assert_eq!(ed25519.score, 100);

        let dsa = grade(&keyed("DSA", 200, Some(1024)), 100, 100).unwrap();
        assert_eq!(dsa.score, 80);

        let rsa = grade(&keyed("RSA", 200, Some(2047)), 100, 100).unwrap();
        assert_eq!(rsa.score, 80);
    }

    #[test]
    fn test_rounding() {
        // 100 - 2*0.4 - 2*0.3 = 98.6
        let grading = grade(&record(200, Some(2048)), 98, 98).unwrap();
        assert_eq!(grading.score, 99);
        // 100 - 1*0.4 = 99.6
        let grading = grade(&record(200, Some(2048)), 99, 100).unwrap();
        assert_eq!(grading.score, 100);
    }

    #[test]
    fn test_grade_boundaries() {
        // 100 - 100*0.4 = 60 -> C
        let grading = grade(&record(200, Some(2048)), 0, 100).unwrap();
        assert_eq!(grading.score, 60);
        assert_eq!(grading.grade, Grade::C);
        assert_eq!(grading.security_level, SecurityLevel::Fair);
        // 100 - 100*0.4 - 100*0.3 = 30 -> E
        let grading = grade(&record(200, Some(2048)), 0, 0).unwrap();
        assert_eq!(grading.score, 30);
        assert_eq!(grading.grade, Grade::E);
    }

    #[test]
    fn test_missing_key_size_fails_fast() {
        let err = grade(&record(200, None), 100, 100).unwrap_err();
        assert_eq!(err, GradingError::MissingField("keySize"));
    }

    #[test]
    fn test_out_of_range_scores_rejected() {
        let err = grade(&record(200, Some(2048)), 101, 100).unwrap_err();
        assert_eq!(
            err,
            GradingError::ScoreOutOfRange {
                field: "protocolScore",
                value: 101
            }
        );
    }

    #[test]
    fn test_deterministic() {
        let cert = record(12, Some(2048));
        assert_eq!(grade(&cert, 70, 65).unwrap(), grade(&cert, 70, 65).unwrap());
    }
}
