//! Structured logging setup for the command-line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to binaries.

use std::fmt;

use tracing_subscriber::{EnvFilter, fmt as tfmt, prelude::*};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Installs a global compact subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Later calls are ignored.
pub fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tfmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    // Ignore error if subscriber was already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Debug), "debug");
        assert_eq!(format!("{}", LogLevel::Info), "info");
        assert_eq!(format!("{}", LogLevel::Error), "error");
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(LogLevel::Warn);
        init_logging(LogLevel::Debug);
        tracing::info!("still running");
    }
}
