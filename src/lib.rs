//! tls_posture library: TLS/certificate posture evaluation
//!
//! Probes a host's TLS endpoint once per protocol version, evaluates the
//! certificate it presents, scores the negotiated cipher and the protocol
//! support matrix, and combines everything into a letter grade with a
//! prioritized list of recommendations.
//!
//! # Example
//!
//! ```no_run
//! use tls_posture::{Analyzer, AnalyzerSettings, ClientCatalog};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(AnalyzerSettings::default(), ClientCatalog::default());
//! let report = analyzer.analyze_input("https://example.com").await?;
//! println!(
//!     "{} scored {} ({}), {} recommendation(s)",
//!     report.domain,
//!     report.grading.score,
//!     report.grading.grade.as_str(),
//!     report.recommendations.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The scoring functions ([`analyze_cipher`], [`analyze_protocols`],
//! [`grade`]) are pure and can be used on their own.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod analysis;
pub mod certificate;
pub mod config;
mod domain;
mod error_handling;
pub mod grading;
pub mod initialization;
pub mod models;
mod run;
pub mod security;
mod server;
pub mod simulation;
pub mod tls;

// Re-export public API
pub use analysis::{analyze_cipher, analyze_protocols, CipherProperties};
pub use config::{AnalyzerSettings, LogFormat, LogLevel};
pub use domain::TargetHost;
pub use error_handling::{AnalysisError, CertificateError, GradingError, InitializationError};
pub use grading::grade;
pub use models::{AnalysisReport, PostureGrade, ProtocolProbeResult, TlsVersion};
pub use run::Analyzer;
pub use server::{router, start_server};
pub use simulation::{simulate, ClientCatalog, ClientProfile};
