//! Flattened, prioritized recommendation list.

use std::collections::HashSet;

use crate::models::{CipherFinding, PostureGrade, Severity};

use super::types::{
    CipherAnalysis, FindingCategory, ProtocolAnalysis, ProtocolDetails, Recommendation,
};

fn from_finding(category: FindingCategory, finding: &CipherFinding) -> Recommendation {
    Recommendation {
        severity: finding.severity,
        category,
        issue: finding.issue.clone(),
        recommendation: finding.remediation.clone(),
    }
}

/// Collects every finding into one list, most severe first.
///
/// Order within a severity tier is certificate, protocol, cipher, then
/// configuration. Duplicate issues are kept once.
pub fn build_recommendations(
    grading: &PostureGrade,
    protocol: &ProtocolAnalysis,
    cipher: &CipherAnalysis,
    details: &ProtocolDetails,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = grading
        .issues
        .iter()
        .map(|f| from_finding(FindingCategory::Certificate, f))
        .chain(
            protocol
                .vulnerabilities
                .iter()
                .chain(&protocol.warnings)
                .map(|f| from_finding(FindingCategory::Protocol, f)),
        )
        .chain(
            cipher
                .issues
                .iter()
                .chain(&cipher.warnings)
                .map(|f| from_finding(FindingCategory::Cipher, f)),
        )
        .collect();

    if details.hsts == Some(false) {
        recommendations.push(Recommendation {
            severity: Severity::Medium,
            category: FindingCategory::Configuration,
            issue: "HSTS not enabled".to_string(),
            recommendation: "Send Strict-Transport-Security with a max-age of at least one year."
                .to_string(),
        });
    }
    if details.ocsp_stapling == Some(false) {
        recommendations.push(Recommendation {
            severity: Severity::Low,
            category: FindingCategory::Configuration,
            issue: "OCSP stapling not enabled".to_string(),
            recommendation: "Enable OCSP stapling to speed up revocation checks.".to_string(),
        });
    }
    if details.heartbeat == Some(true) {
        recommendations.push(Recommendation {
            severity: Severity::Medium,
            category: FindingCategory::Configuration,
            issue: "TLS heartbeat extension enabled".to_string(),
            recommendation: "Disable the heartbeat extension unless it is required.".to_string(),
        });
    }

    let mut seen = HashSet::new();
    recommendations.retain(|r| seen.insert(r.issue.clone()));
    // Stable sort keeps the category order inside each tier.
    recommendations.sort_by_key(|r| r.severity);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::CipherDetails;
    use crate::models::{Grade, SecurityLevel};

    fn finding(severity: Severity, issue: &str) -> CipherFinding {
        CipherFinding::new(severity, issue, "", format!("fix {issue}"))
    }

    fn cipher_analysis(issues: Vec<CipherFinding>, warnings: Vec<CipherFinding>) -> CipherAnalysis {
        CipherAnalysis {
            rating: Grade::A,
            score: 90,
            issues,
            warnings,
            details: CipherDetails {
                name: "AES256-SHA".into(),
                standard_name: "TLS_RSA_WITH_AES_256_CBC_SHA".into(),
                bits: 256,
                aead: false,
                forward_secrecy: false,
                cbc: true,
                supports_chacha: false,
            },
        }
    }

    #[test]
    fn test_sorted_by_severity_and_deduplicated() {
        let grading = PostureGrade {
            grade: Grade::B,
            score: 70,
            issues: vec![finding(Severity::High, "certificate expires soon")],
            security_level: SecurityLevel::Good,
        };
        let protocol = ProtocolAnalysis {
            vulnerabilities: vec![finding(Severity::Critical, "TLS 1.2 not supported")],
            warnings: vec![finding(Severity::Medium, "TLS 1.3 not supported")],
            score: 40,
        };
        let cipher = cipher_analysis(
            vec![
                finding(Severity::Medium, "no forward secrecy"),
                finding(Severity::Medium, "no forward secrecy"),
            ],
            vec![finding(Severity::Low, "CBC mode (AEAD recommended)")],
        );
        let details = ProtocolDetails {
            hsts: Some(false),
            ..Default::default()
        };

        let list = build_recommendations(&grading, &protocol, &cipher, &details);
        let issues: Vec<&str> = list.iter().map(|r| r.issue.as_str()).collect();
        assert_eq!(
            issues,
            vec![
                "TLS 1.2 not supported",
                "certificate expires soon",
                "TLS 1.3 not supported",
                "no forward secrecy",
                "HSTS not enabled",
                "CBC mode (AEAD recommended)",
            ]
        );
        assert_eq!(list[0].category, FindingCategory::Protocol);
        assert_eq!(list[0].recommendation, "fix TLS 1.2 not supported");
    }

    #[test]
    fn test_clean_host_has_no_recommendations() {
        let grading = PostureGrade {
            grade: Grade::APlus,
            score: 100,
            issues: vec![],
            security_level: SecurityLevel::Excellent,
        };
        let protocol = ProtocolAnalysis {
            vulnerabilities: vec![],
            warnings: vec![],
            score: 100,
        };
        let list = build_recommendations(
            &grading,
            &protocol,
            &cipher_analysis(vec![], vec![]),
            &ProtocolDetails::default(),
        );
        assert!(list.is_empty());
    }
}
