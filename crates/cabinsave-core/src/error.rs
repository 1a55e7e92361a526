//! Centralized error types for cabinsave.
//!
//! Upstream provider failures are never shown to end users as faults; these
//! types exist so the failures can be classified, logged and, at process
//! level, reported with a short human-readable message.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get an operator-facing message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a short message suitable for printing on startup failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "An I/O operation failed. Check the bind address and permissions.",
            AppError::Other(_) => "An unexpected error occurred.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The provider is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = [
            AppError::Network(NetworkError::Timeout),
            AppError::Network(NetworkError::InvalidResponse("x".into())),
            AppError::Config(ConfigError::Invalid("x".into())),
            AppError::Io(std::io::Error::other("x")),
            AppError::Other(anyhow::anyhow!("x")),
        ];

        for err in &errors {
            assert!(!err.user_message().is_empty(), "empty message for {err:?}");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let config_err = ConfigError::MissingSetting("geocoding.user_agent".into());
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::MissingSetting(_))));
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        let client = NetworkError::ServerError {
            status: 429,
            message: "slow down".into(),
        };
        assert!(upstream.user_message().contains("provider"));
        assert_eq!(client.user_message(), "The request failed. Please try again.");
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Config(ConfigError::ParseError("bad toml".into()));
        assert_eq!(
            app_err.user_message(),
            "Configuration file is malformed. Check your settings."
        );
    }
}
