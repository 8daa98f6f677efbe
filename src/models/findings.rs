//! Findings, letter grades and the terminal posture grade.

use serde::{Serialize, Serializer};

/// Severity tier of a finding.
///
/// Declaration order is priority order: sorting ascending puts critical
/// findings first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    None,
}

/// A scored, categorized issue with its server-side remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherFinding {
    pub severity: Severity,
    pub issue: String,
    pub description: String,
    pub remediation: String,
}

impl CipherFinding {
    pub fn new(
        severity: Severity,
        issue: impl Into<String>,
        description: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            issue: issue.into(),
            description: description.into(),
            remediation: remediation.into(),
        }
    }
}

/// Letter grade. `E` only occurs on the posture scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Cipher rating scale: >=90 A+, >=80 A, >=70 B, >=60 C, >=50 D, else F.
    pub fn from_cipher_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Posture scale, coarser at the top than the cipher scale:
    /// >=95 A+, >=80 A, >=65 B, >=50 C, >=35 D, >=20 E, else F.
    pub fn from_posture_score(score: u8) -> Self {
        match score {
            95..=u8::MAX => Grade::APlus,
            80..=94 => Grade::A,
            65..=79 => Grade::B,
            50..=64 => Grade::C,
            35..=49 => Grade::D,
            20..=34 => Grade::E,
            _ => Grade::F,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Coarse label derived purely from the posture grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecurityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl From<Grade> for SecurityLevel {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::APlus | Grade::A => SecurityLevel::Excellent,
            Grade::B => SecurityLevel::Good,
            Grade::C => SecurityLevel::Fair,
            Grade::D | Grade::E | Grade::F => SecurityLevel::Poor,
        }
    }
}

/// Terminal output of the grading engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureGrade {
    pub grade: Grade,
    pub score: u8,
    /// Certificate findings that contributed point deductions.
    pub issues: Vec<CipherFinding>,
    pub security_level: SecurityLevel,
}
