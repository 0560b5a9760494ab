//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while assembling the startup configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// A file referenced by the configuration could not be read
    #[error("Config file unreadable: {path}: {message}")]
    ReadError {
        /// Filesystem path that was requested
        path: String,
        /// Description of the IO failure
        message: String,
    },

    /// A file referenced by the configuration is not valid JSON of the expected shape
    #[error("Config parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },

    /// Config validation error (missing or invalid values)
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl ConfigError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::ParseError { message: e.to_string() }
    }

    /// Create a read error from an IO error.
    pub fn from_io_error(path: impl Into<String>, e: &std::io::Error) -> Self {
        Self::ReadError { path: path.into(), message: e.to_string() }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        Self::ValidationError { field: field.to_string(), message: message.to_string() }
    }
}
