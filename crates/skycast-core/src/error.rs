//! Centralized error types for the Skycast service.
//!
//! Each component crate keeps its own `thiserror` enum and converts into
//! [`AppError`] at the boundary:
//! - `NotFound` is the only variant a client ever sees in detail (as a 404)
//! - everything else is reported to clients as a generic server error
//! - the full message is kept for logging

use thiserror::Error;

/// Top-level service error.
///
/// Use `user_message()` for the text sent back over HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Weather lookup failed: {0}")]
    WeatherLookup(String),

    #[error("Report delivery failed: {0}")]
    Delivery(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// True when the error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// The message safe to return to an HTTP client.
    ///
    /// Only `NotFound` and `Validation` are distinguishable; everything else
    /// collapses to the same generic text.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "User not found",
            AppError::Validation(_) => "Bad Request",
            AppError::Store(_)
            | AppError::WeatherLookup(_)
            | AppError::Delivery(_)
            | AppError::Config(_)
            | AppError::Other(_) => "Internal Server Error",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingSetting(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_client_visible() {
        let err = AppError::NotFound("abc".into());
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "User not found");
    }

    #[test]
    fn test_validation_message_is_generic() {
        let err = AppError::Validation("key must be a string at line 1 column 2".into());
        assert!(!err.is_not_found());
        assert_eq!(err.user_message(), "Bad Request");
    }

    #[test]
    fn test_internal_errors_share_generic_message() {
        let errors = vec![
            AppError::Store("disk full".into()),
            AppError::WeatherLookup("timeout".into()),
            AppError::Delivery("relay refused".into()),
            AppError::Other(anyhow::anyhow!("boom")),
        ];

        for err in errors {
            assert!(!err.is_not_found());
            assert_eq!(err.user_message(), "Internal Server Error");
        }
    }

    #[test]
    fn test_detail_kept_for_logging() {
        let err = AppError::Store("database is locked".into());
        assert!(err.to_string().contains("database is locked"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: AppError = ConfigError::MissingSetting("smtp.host".into()).into();
        assert!(matches!(err, AppError::Config(ConfigError::MissingSetting(_))));
    }
}
