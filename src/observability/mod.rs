//! Process-wide logging setup.

use crate::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for interactive use.
    #[default]
    Pretty,
    /// Line-delimited JSON for machine consumption.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Lower the default level from `info` to `debug`.
    pub verbose: bool,
}

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Initializes the global tracing subscriber.
///
/// The level defaults to `info` (`debug` with `verbose`) and is
/// overridable through `GRAPHSERIES_LOG`. Log lines go to stderr so
/// report output on stdout stays parseable.
///
/// # Errors
///
/// Returns an error if logging has already been initialized in this
/// process.
pub fn init(config: LoggingConfig) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Err(Error::Config("logging already initialized".to_string()));
    }

    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("GRAPHSERIES_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let init_result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init(),
    };
    init_result.map_err(|e| Error::Config(format!("logging init failed: {e}")))?;

    let _ = LOGGING_INIT.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_second_init_in_one_process_fails() {
        // Whichever call runs first wins; the second must refuse.
        let first = init(LoggingConfig::default());
        let second = init(LoggingConfig {
            verbose: true,
            ..LoggingConfig::default()
        });
        assert!(first.is_ok() || matches!(first, Err(Error::Config(_))));
        assert!(second.is_err());
    }
}
