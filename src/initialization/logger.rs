//! Logger initialization.
//!
//! `env_logger` behind the `log` facade, in one of two shapes:
//! - plain: `HH:MM:SS.mmm target [LEVEL] message`, colored for terminals
//! - json: one `{"ts","level","target","msg"}` object per line

use std::io::{self, Write};

use colored::*;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependency targets and the most verbose level they may log at.
const DEPENDENCY_CAPS: [(&str, LevelFilter); 6] = [
    ("rustls", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    // Truncated or malformed DNS responses are retried by hickory itself
    ("hickory_proto", LevelFilter::Error),
    ("hickory_resolver", LevelFilter::Warn),
];

/// Initializes the logger.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate, so
/// `RUST_LOG=debug tls_posture analyze example.com --log-level info` logs at
/// info.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (target, cap) in DEPENDENCY_CAPS {
        builder.filter_module(target, cap.min(level));
    }
    builder.filter_module("tls_posture", level);

    match format {
        LogFormat::Json => builder.format(json_line),
        LogFormat::Plain => builder.format(plain_line),
    };

    // try_init: tests install loggers more than once
    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

fn json_line(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let msg = serde_json::to_string(&record.args().to_string()).unwrap_or_else(|_| "\"\"".into());
    writeln!(
        buf,
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        chrono::Utc::now().timestamp_millis(),
        record.level(),
        record.target(),
        msg
    )
}

fn plain_line(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    writeln!(
        buf,
        "{} {} [{}] {}",
        chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
        record.target().cyan(),
        colored_level(record.level()),
        record.args()
    )
}

fn colored_level(level: Level) -> ColoredString {
    let label = level.to_string();
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // env_logger can only be installed once per process, so every call after
    // the first returns LoggerError. Neither outcome may panic.

    #[test]
    fn test_init_logger_plain_format() {
        let result = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        assert!(matches!(result, Ok(()) | Err(InitializationError::LoggerError(_))));
    }

    #[test]
    fn test_init_logger_json_format() {
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Ok(()) | Err(InitializationError::LoggerError(_))));
    }

    #[test]
    fn test_second_init_fails_gracefully() {
        let _ = init_logger_with(LevelFilter::Warn, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Trace, LogFormat::Plain);
        assert!(matches!(second, Err(InitializationError::LoggerError(_))));
    }
}
