//! Global `tracing` subscriber setup.

use crate::LogFormat;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the configured filter parses.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Build the event filter: `RUST_LOG` wins over `configured`.
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a `fmt` subscriber writing to stderr.
pub fn init_tracing(format: LogFormat, filter: Option<&str>) -> Result<(), InitError> {
    let registry = tracing_subscriber::registry().with(env_filter(filter));
    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Human => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    result.map_err(|_| InitError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_falls_back() {
        let filter = env_filter(Some("[[not a filter"));
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_tracing(LogFormat::Human, Some("warn"));
        assert!(matches!(
            init_tracing(LogFormat::Json, None),
            Err(InitError::AlreadyInstalled)
        ));
    }
}
