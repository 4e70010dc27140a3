//! Structured logging setup using tracing.
//!
//! `RUST_LOG` wins over the configured filter. JSON output is meant for log
//! aggregation; the pretty format is for operators at a terminal.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays clean. Calling this
/// twice is harmless; the second call leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) {
    let filter_layer = match EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Invalid log filter '{}': {e}, falling back to 'info'", config.filter);
            EnvFilter::new("info")
        }
    };

    let registry = tracing_subscriber::registry().with(filter_layer);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(filter = %config.filter, format = ?config.format, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        let config = LoggingConfig {
            filter: "not a [valid filter".to_string(),
            format: LogFormat::Json,
        };
        init_logging(&config);
        init_logging(&LoggingConfig::default());
    }
}
