//! Shared error types for engagemap.
//!
//! Library code returns [`Result`]; the binary wraps these in `anyhow` at the
//! edges. Empty inputs are never errors: aggregations over nothing are zero.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for engagemap operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("I/O error: {message} (path: {})", path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be decoded
    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A decoded document violates a data-model invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A user-supplied value did not name a known variant
    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

impl Error {
    /// Create an I/O error with path context
    pub fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "I/O",
            Self::Parse { .. } => "Parse",
            Self::Validation(_) => "Validation",
            Self::Configuration(_) => "Config",
            Self::UnknownValue { .. } => "Argument",
        }
    }

    /// Whether the error came from reading or decoding a document.
    ///
    /// These are the failures a dashboard recovers from by keeping the
    /// previously loaded state.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Parse { .. } | Self::Validation(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
