//! Error types for the weathervane agent.
//!
//! Three classes with different dispositions:
//! - [`ConfigError`] — fatal; the daemon exits before the loop starts.
//! - [`FetchError`] — recoverable; the cycle is logged and skipped.
//! - [`SubmitError`] — recoverable; the cycle continues to its sleep.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that make the agent unable to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{0} is still set to its placeholder value")]
    Placeholder(&'static str),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to read env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a single weather fetch.
///
/// Status codes are carried as bare `u16` so this crate stays free of HTTP
/// types. None of the variants ever embed the API key.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid weather API URL: {0}")]
    InvalidUrl(String),

    #[error("connection to weather API failed: {0}")]
    Connect(String),

    #[error("weather API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("weather API returned HTTP {0}")]
    Status(u16),

    #[error("failed to read weather API response body: {0}")]
    Body(String),

    #[error("unexpected weather API response: {0}")]
    Malformed(String),
}

/// Errors from metric submission or metrics-backend initialization.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid metrics API URL: {0}")]
    InvalidUrl(String),

    #[error("metrics API request failed: {0}")]
    Transport(String),

    #[error("metrics API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("metrics API returned HTTP {status} for {metric}")]
    Status { status: u16, metric: String },

    #[error("metrics API rejected credentials (HTTP {0})")]
    Unauthorized(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_variable() {
        let err = ConfigError::Missing("OPENWEATHER_API_KEY");
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));

        let err = ConfigError::Placeholder("ZIP_CODE");
        assert!(err.to_string().contains("ZIP_CODE"));
    }

    #[test]
    fn submit_status_names_the_metric() {
        let err = SubmitError::Status {
            status: 403,
            metric: "environment.temperature.outside".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("environment.temperature.outside"));
    }
}
