//! Error types for autotrans.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the translation engine and its collaborators.
///
/// Provider failures are the only errors the engine itself ever sees at
/// runtime; the remaining variants come from settings persistence and
/// configuration.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TranslateError {
    /// The translation provider answered with an error status
    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: String,
        status_code: Option<u16>,
        message: String,
    },

    /// The request never produced a response (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered but the payload could not be used
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration error (missing API key, unknown service, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },
}

impl TranslateError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Provider error
    pub fn provider(
        provider: impl Into<String>,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a MalformedResponse error for a result list whose length does
    /// not match the request.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::MalformedResponse(format!(
            "expected {} translations, provider returned {}",
            expected, actual
        ))
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error came from talking to the translation provider.
    ///
    /// Returns true for `Provider`, `Network` and `MalformedResponse`, which
    /// are the failures the automatic paths swallow and retry on the next
    /// trigger.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Network(_) | Self::MalformedResponse(_)
        )
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TranslateError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TranslateError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TranslateError>`.
pub type Result<T> = std::result::Result<T, TranslateError>;
