//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `tls_posture` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;

use tls_posture::config::{Cli, Command};
use tls_posture::initialization::{init_crypto_provider, init_logger_with};
use tls_posture::{start_server, Analyzer, ClientCatalog};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let catalog = match &cli.probe.clients {
        Some(path) => ClientCatalog::from_json_file(path).context("Failed to load client catalog")?,
        None => ClientCatalog::default(),
    };
    let analyzer = Analyzer::new(cli.probe.settings(), catalog);

    match cli.command {
        Command::Analyze(args) => match analyzer.analyze_input(&args.domain).await {
            Ok(report) => {
                let json = if args.pretty {
                    serde_json::to_string_pretty(&report)
                } else {
                    serde_json::to_string(&report)
                }
                .context("Failed to serialize report")?;
                println!("{json}");
                eprintln!(
                    "{} {}:{} grade {} (score {}, {:?})",
                    "✔".green(),
                    report.domain,
                    report.port,
                    report.grading.grade.as_str().bold(),
                    report.grading.score,
                    report.grading.security_level
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("tls_posture error: {e}");
                process::exit(1);
            }
        },
        Command::Serve(args) => {
            if let Err(e) = start_server(&args.bind, args.port, analyzer).await {
                eprintln!("tls_posture error: {:#}", e);
                process::exit(1);
            }
            Ok(())
        }
    }
}
