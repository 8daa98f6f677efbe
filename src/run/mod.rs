//! Evaluation orchestration.
//!
//! [`Analyzer`] owns the long-lived resources (resolver, client catalog) and
//! runs one evaluation per call:
//! 1. Resolve the host once (IP literals skip DNS)
//! 2. Probe all four versions concurrently and join
//! 3. Enumerate cipher suites and read HSTS from the same address, both
//!    bounded by what is left of the deadline and allowed to degrade
//! 4. Assemble the report (pure, see `report`)
//!
//! Evaluations share no mutable state, so one `Analyzer` can serve concurrent
//! requests.

mod report;

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hickory_resolver::TokioAsyncResolver;
use log::{debug, info, warn};
use tokio::time::Instant;

use crate::config::AnalyzerSettings;
use crate::domain::TargetHost;
use crate::error_handling::AnalysisError;
use crate::initialization::{init_hsts_client, init_resolver};
use crate::models::{AnalysisReport, TlsVersion};
use crate::security::{fetch_hsts, HstsStatus};
use crate::simulation::ClientCatalog;
use crate::tls::{enumerate_ciphers, probe_all, Enumeration, ProbeTarget};

use report::{build_report, require_reachable, Gathered};

/// Runs evaluations.
///
/// # Examples
///
/// ```no_run
/// use tls_posture::{Analyzer, AnalyzerSettings, ClientCatalog};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let analyzer = Analyzer::new(AnalyzerSettings::default(), ClientCatalog::default());
/// let report = analyzer.analyze_input("example.com").await?;
/// println!("{}: {:?} ({})", report.domain, report.grading.grade, report.grading.score);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Analyzer {
    settings: AnalyzerSettings,
    resolver: Arc<TokioAsyncResolver>,
    catalog: Arc<ClientCatalog>,
}

impl Analyzer {
    pub fn new(settings: AnalyzerSettings, catalog: ClientCatalog) -> Self {
        Self {
            resolver: init_resolver(),
            catalog: Arc::new(catalog),
            settings,
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Validates `input` and evaluates it.
    pub async fn analyze_input(&self, input: &str) -> Result<AnalysisReport, AnalysisError> {
        let target = TargetHost::parse(input)?;
        self.analyze(&target).await
    }

    /// Evaluates one host.
    ///
    /// # Errors
    ///
    /// - `Resolution` / `Unreachable` / `MissingCertificate` when no
    ///   certificate could be obtained
    /// - `DeadlineExceeded` when resolution and the version probes did not
    ///   finish within the overall budget
    /// - `MalformedCertificate`, `Grading` or `Internal` for analysis failures
    pub async fn analyze(&self, target: &TargetHost) -> Result<AnalysisReport, AnalysisError> {
        let budget = self.settings.deadline();
        let deadline = Instant::now() + budget;
        info!("Analyzing {target} (deadline {budget:?})");

        let result = self.run(target, deadline, budget).await;
        match &result {
            Ok(report) => info!(
                "{target}: grade {} (score {}), preferred {}",
                report.grading.grade.as_str(),
                report.grading.score,
                report.preferred_protocol
            ),
            Err(e) => warn!("{target}: analysis failed: {e}"),
        }
        result
    }

    async fn run(
        &self,
        target: &TargetHost,
        deadline: Instant,
        budget: Duration,
    ) -> Result<AnalysisReport, AnalysisError> {
        let (address, results) = tokio::time::timeout_at(deadline, async {
            let address = self.resolve(target).await?;
            let probe_target = ProbeTarget::new(target.host(), address);
            let results = probe_all(&probe_target, &self.settings).await;
            Ok::<_, AnalysisError>((address, results))
        })
        .await
        .map_err(|_| AnalysisError::DeadlineExceeded(budget))??;

        // Fail before spending more handshakes on a host that never answered.
        require_reachable(target, &results)?;

        let supported: Vec<TlsVersion> = results
            .iter()
            .filter(|r| r.supported)
            .map(|r| r.version)
            .collect();
        let probe_target = ProbeTarget::new(target.host(), address);

        let enumeration = async {
            if !self.settings.enumerate_ciphers {
                return Enumeration::default();
            }
            bounded(
                deadline,
                "cipher enumeration",
                enumerate_ciphers(&probe_target, &supported, &self.settings),
            )
            .await
            .unwrap_or_default()
        };
        let hsts = async {
            if !self.settings.check_hsts {
                return HstsStatus::NotChecked;
            }
            let client = match init_hsts_client(&self.settings, target.host(), address) {
                Ok(client) => client,
                Err(e) => {
                    warn!("HSTS client unavailable for {target}: {e}");
                    return HstsStatus::NotChecked;
                }
            };
            bounded(
                deadline,
                "HSTS check",
                fetch_hsts(&client, target.host(), target.port()),
            )
            .await
            .unwrap_or_default()
        };
        let (enumeration, hsts) = tokio::join!(enumeration, hsts);

        build_report(
            target,
            Gathered {
                address,
                results,
                enumeration,
                hsts,
            },
            &self.catalog,
            Utc::now(),
        )
    }

    /// Resolves the host to the single address every probe connects to.
    async fn resolve(&self, target: &TargetHost) -> Result<SocketAddr, AnalysisError> {
        if let Some(ip) = target.ip_literal() {
            return Ok(SocketAddr::new(ip, target.port()));
        }

        let lookup = self
            .resolver
            .lookup_ip(target.host())
            .await
            .map_err(|e| AnalysisError::Resolution {
                host: target.host().to_string(),
                message: e.to_string(),
            })?;

        // Prefer IPv4: many hosts publish AAAA records they do not serve TLS on.
        let addresses: Vec<IpAddr> = lookup.iter().collect();
        let ip = addresses
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addresses.first())
            .copied()
            .ok_or_else(|| AnalysisError::Resolution {
                host: target.host().to_string(),
                message: "no addresses returned".to_string(),
            })?;

        debug!("{} resolved to {ip}", target.host());
        Ok(SocketAddr::new(ip, target.port()))
    }
}

/// Runs an optional phase until `deadline`, logging instead of failing when
/// it runs out.
async fn bounded<T>(deadline: Instant, phase: &str, future: impl Future<Output = T>) -> Option<T> {
    match tokio::time::timeout_at(deadline, future).await {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{phase} skipped: evaluation deadline reached");
            None
        }
    }
}
