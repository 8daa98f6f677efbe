//! Cipher classification and scoring.
//!
//! A cipher name is scanned once into [`CipherProperties`]; every scoring rule
//! then reads the struct instead of re-matching substrings.

use crate::models::{CipherDescriptor, CipherFinding, Grade, Severity};

use super::types::{CipherAnalysis, CipherDetails};

/// Components whose presence alone makes a suite unusable.
const BANNED_COMPONENTS: [&str; 6] = ["RC4", "DES", "MD5", "NULL", "EXPORT", "anon"];

/// Flags extracted from a cipher suite name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CipherProperties {
    pub has_rc4: bool,
    /// Single DES (not triple-DES).
    pub has_des: bool,
    pub has_3des: bool,
    pub has_md5: bool,
    pub has_null: bool,
    pub has_export: bool,
    pub has_anon: bool,
    pub has_ecdhe: bool,
    pub has_dhe: bool,
    pub has_aead: bool,
    pub has_chacha: bool,
    /// TLS 1.3 suite (always ephemeral key exchange).
    pub is_tls13: bool,
    pub bits: u16,
}

impl CipherProperties {
    /// Classifies an OpenSSL-style or IANA-style suite name.
    pub fn classify(name: &str, bits: u16) -> Self {
        let upper = name.to_ascii_uppercase();

        let has_3des =
            upper.contains("3DES") || upper.contains("DES-CBC3") || upper.contains("DES_EDE");
        // Strip the triple-DES spellings before looking for single DES.
        let without_3des = upper
            .replace("3DES", "")
            .replace("DES-CBC3", "")
            .replace("DES_EDE", "");

        let is_tls13 = (upper.starts_with("TLS_AES_") || upper.starts_with("TLS_CHACHA20_"))
            && !upper.contains("_WITH_");

        Self {
            has_rc4: upper.contains("RC4"),
            has_des: without_3des.contains("DES"),
            has_3des,
            has_md5: upper.contains("MD5"),
            has_null: upper.contains("NULL"),
            has_export: upper.contains("EXPORT") || upper.contains("EXP-"),
            has_anon: upper.contains("ANON")
                || upper.starts_with("ADH-")
                || upper.starts_with("AECDH-"),
            has_ecdhe: upper.contains("ECDHE"),
            // "ECDHE" contains "DHE"; only count DHE when it stands on its own.
            has_dhe: upper.replace("ECDHE", "").contains("DHE") || upper.starts_with("EDH-"),
            has_aead: upper.contains("GCM") || upper.contains("CCM") || upper.contains("POLY1305"),
            has_chacha: upper.contains("CHACHA"),
            is_tls13,
            bits,
        }
    }

    /// Banned components present, in their canonical spelling.
    pub fn banned_components(&self) -> Vec<&'static str> {
        let flags = [
            self.has_rc4,
            self.has_des,
            self.has_md5,
            self.has_null,
            self.has_export,
            self.has_anon,
        ];
        BANNED_COMPONENTS
            .iter()
            .zip(flags)
            .filter_map(|(component, present)| present.then_some(*component))
            .collect()
    }

    pub fn forward_secrecy(&self) -> bool {
        self.has_ecdhe || self.has_dhe || self.is_tls13
    }

    /// Block cipher in CBC mode: anything that is neither AEAD, a stream
    /// cipher, nor the NULL cipher.
    pub fn is_cbc(&self) -> bool {
        !self.has_aead && !self.has_rc4 && !self.has_null
    }
}

impl CipherDescriptor {
    /// Builds a descriptor whose AEAD and forward-secrecy flags come from the
    /// name classification.
    pub fn classified(id: u16, name: &str, standard_name: &str, bits: u16) -> Self {
        let properties = CipherProperties::classify(name, bits);
        Self {
            name: name.to_string(),
            standard_name: standard_name.to_string(),
            id,
            bits,
            aead: properties.has_aead,
            forward_secrecy: properties.forward_secrecy(),
        }
    }
}

/// Scores the negotiated cipher.
///
/// Starts at 100; a banned component forces 0 and skips every other rule.
/// Otherwise deductions accumulate and the result is clamped to `[0, 100]`.
/// `observed` is every cipher seen for the host and only feeds
/// `details.supports_chacha`.
pub fn analyze_cipher(cipher: &CipherDescriptor, observed: &[CipherDescriptor]) -> CipherAnalysis {
    let properties = CipherProperties::classify(&cipher.name, cipher.bits);
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut score: i32 = 100;

    let banned = properties.banned_components();
    if !banned.is_empty() {
        score = 0;
        for component in banned {
            issues.push(CipherFinding::new(
                Severity::Critical,
                format!("insecure cipher component: {component}"),
                format!(
                    "The negotiated suite {} uses {component}, which offers no meaningful protection.",
                    cipher.name
                ),
                format!("Remove every suite containing {component} from the server cipher list."),
            ));
        }
    } else {
        if properties.has_3des {
            score -= 40;
            issues.push(CipherFinding::new(
                Severity::High,
                "3DES deprecated (Sweet32)",
                "Triple-DES has a 64-bit block size and is vulnerable to birthday attacks (CVE-2016-2183).",
                "Disable 3DES suites and prefer AES-GCM or ChaCha20-Poly1305.",
            ));
        }

        match properties.bits {
            0..=111 => {
                score = 0;
                issues.push(CipherFinding::new(
                    Severity::Critical,
                    format!("weak encryption strength ({} bits)", properties.bits),
                    "Symmetric keys shorter than 112 bits can be brute-forced.",
                    "Only allow suites with at least 128-bit symmetric keys.",
                ));
            }
            112..=127 => {
                score -= 30;
                issues.push(CipherFinding::new(
                    Severity::High,
                    format!("insufficient encryption strength ({} bits)", properties.bits),
                    "Keys between 112 and 127 bits fall below the current 128-bit baseline.",
                    "Prefer AES-128 or stronger suites.",
                ));
            }
            128..=255 => {
                score -= 5;
                warnings.push(CipherFinding::new(
                    Severity::Low,
                    format!("{}-bit encryption (256-bit available)", properties.bits),
                    "128-bit suites are secure today; 256-bit suites add margin.",
                    "Consider preferring AES-256-GCM or ChaCha20-Poly1305.",
                ));
            }
            _ => {}
        }

        if !properties.forward_secrecy() {
            score -= 30;
            issues.push(CipherFinding::new(
                Severity::Medium,
                "no forward secrecy",
                "The suite uses static key exchange; a leaked server key decrypts recorded sessions.",
                "Prefer ECDHE or DHE key exchange suites.",
            ));
        }

        if properties.is_cbc() {
            score -= 10;
            warnings.push(CipherFinding::new(
                Severity::Low,
                "CBC mode (AEAD recommended)",
                "CBC suites have a history of padding-oracle attacks (Lucky13, POODLE).",
                "Prefer AEAD suites (GCM, CCM or ChaCha20-Poly1305).",
            ));
        }
    }

    let score = score.clamp(0, 100) as u8;

    CipherAnalysis {
        rating: Grade::from_cipher_score(score),
        score,
        issues,
        warnings,
        details: CipherDetails {
            name: cipher.name.clone(),
            standard_name: cipher.standard_name.clone(),
            bits: cipher.bits,
            aead: properties.has_aead,
            forward_secrecy: properties.forward_secrecy(),
            cbc: properties.is_cbc(),
            supports_chacha: observed
                .iter()
                .any(|c| c.name.to_ascii_uppercase().contains("CHACHA")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, bits: u16) -> CipherDescriptor {
        CipherDescriptor::classified(0, name, name, bits)
    }

    #[test]
    fn test_classify_ecdhe_gcm() {
        let props = CipherProperties::classify("ECDHE-RSA-AES128-GCM-SHA256", 128);
        assert!(props.has_ecdhe);
        assert!(!props.has_dhe);
        assert!(props.has_aead);
        assert!(props.forward_secrecy());
        assert!(!props.is_cbc());
        assert!(props.banned_components().is_empty());
    }

    #[test]
    fn test_classify_triple_des_is_not_single_des() {
        let props = CipherProperties::classify("ECDHE-RSA-DES-CBC3-SHA", 112);
        assert!(props.has_3des);
        assert!(!props.has_des);

        let iana = CipherProperties::classify("TLS_RSA_WITH_3DES_EDE_CBC_SHA", 112);
        assert!(iana.has_3des);
        assert!(!iana.has_des);

        let single = CipherProperties::classify("DES-CBC-SHA", 56);
        assert!(single.has_des);
        assert!(!single.has_3des);
    }

    #[test]
    fn test_classify_anon_spellings() {
        assert!(CipherProperties::classify("ADH-AES128-SHA", 128).has_anon);
        assert!(CipherProperties::classify("AECDH-AES256-SHA", 256).has_anon);
        assert!(CipherProperties::classify("TLS_DH_anon_WITH_AES_128_CBC_SHA", 128).has_anon);
    }

    #[test]
    fn test_tls13_suites_have_forward_secrecy() {
        let props = CipherProperties::classify("TLS_AES_256_GCM_SHA384", 256);
        assert!(props.is_tls13);
        assert!(props.forward_secrecy());
    }

    #[test]
    fn test_ecdhe_does_not_count_as_dhe() {
        let props = CipherProperties::classify("ECDHE-ECDSA-AES256-GCM-SHA384", 256);
        assert!(props.has_ecdhe);
        assert!(!props.has_dhe);
        assert!(CipherProperties::classify("DHE-RSA-AES256-GCM-SHA384", 256).has_dhe);
    }

    #[test]
    fn test_modern_aead_suite_scores_95() {
        let cipher = named("ECDHE-RSA-AES128-GCM-SHA256", 128);
        let analysis = analyze_cipher(&cipher, std::slice::from_ref(&cipher));
        assert_eq!(analysis.score, 95);
        assert_eq!(analysis.rating, Grade::APlus);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.warnings.len(), 1);
    }

    #[test]
    fn test_256_bit_aead_suite_is_perfect() {
        let cipher = named("ECDHE-ECDSA-AES256-GCM-SHA384", 256);
        let analysis = analyze_cipher(&cipher, &[]);
        assert_eq!(analysis.score, 100);
        assert_eq!(analysis.rating, Grade::APlus);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_rc4_overrides_everything() {
        let cipher = named("ECDHE-RSA-RC4-SHA", 256);
        let analysis = analyze_cipher(&cipher, &[]);
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.rating, Grade::F);
        assert_eq!(analysis.issues.len(), 1);
        assert_eq!(analysis.issues[0].issue, "insecure cipher component: RC4");
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_static_rsa_cbc_suite() {
        let cipher = named("AES256-SHA", 256);
        let analysis = analyze_cipher(&cipher, &[]);
        // -30 forward secrecy, -10 CBC
        assert_eq!(analysis.score, 60);
        assert_eq!(analysis.rating, Grade::C);
        assert!(analysis.issues.iter().any(|f| f.issue == "no forward secrecy"));
        assert!(analysis
            .warnings
            .iter()
            .any(|f| f.issue == "CBC mode (AEAD recommended)"));
    }

    #[test]
    fn test_triple_des_stacks_with_strength_penalty() {
        let cipher = named("DES-CBC3-SHA", 112);
        let analysis = analyze_cipher(&cipher, &[]);
        // 100 - 40 (3DES) - 30 (112 bits) - 30 (no FS) - 10 (CBC) clamps to 0
        assert_eq!(analysis.score, 0);
        assert!(analysis
            .issues
            .iter()
            .any(|f| f.issue == "3DES deprecated (Sweet32)"));
    }

    #[test]
    fn test_sub_112_bits_zeroes_score() {
        let cipher = named("ECDHE-RSA-AES96-GCM-SHA256", 96);
        let analysis = analyze_cipher(&cipher, &[]);
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_supports_chacha_uses_observed_set() {
        let negotiated = named("ECDHE-RSA-AES256-GCM-SHA384", 256);
        let chacha = named("ECDHE-RSA-CHACHA20-POLY1305", 256);
        assert!(analyze_cipher(&negotiated, &[negotiated.clone(), chacha]).details.supports_chacha);
        assert!(!analyze_cipher(&negotiated, std::slice::from_ref(&negotiated)).details.supports_chacha);
    }
}
