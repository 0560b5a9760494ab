//! Delivery pipeline errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StoreError;
use crate::models::DeliveryStage;

/// Request-level failures, one per terminal state of the delivery pipeline.
///
/// `Display` carries diagnostic detail for logs. Response bodies use
/// [`DeliveryError::public_message`], which never includes internal detail.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum DeliveryError {
    /// No token query parameter on the request
    #[error("Missing token")]
    MissingToken,

    /// Token supplied but does not match the configured secret
    #[error("Invalid token")]
    InvalidToken,

    /// Request path has no configuration segment
    #[error("No configuration specified")]
    NoConfigName,

    /// Path segment is not valid percent-encoded UTF-8
    #[error("Invalid configuration name: {message}")]
    InvalidName { message: String },

    /// Neither key variant resolved to a stored value
    #[error("Configuration not found: {name}")]
    NotFound { name: String },

    /// The store itself failed while reading
    #[error("Store read failed: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Stored value is not a well-formed envelope
    #[error("Invalid configuration data: {message}")]
    InvalidEnvelope { message: String },

    /// Payload field absent or not decodable to UTF-8 text
    #[error("Failed to decode configuration: {message}")]
    DecodeFailed { message: String },

    /// Anything else (bugs, unexpected states)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeliveryError {
    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingToken => 401,
            Self::InvalidToken => 403,
            Self::InvalidName { .. } => 400,
            Self::NoConfigName | Self::NotFound { .. } => 404,
            Self::StoreUnavailable(_)
            | Self::InvalidEnvelope { .. }
            | Self::DecodeFailed { .. }
            | Self::Internal { .. } => 500,
        }
    }

    /// Response body text shown to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Missing token",
            Self::InvalidToken => "Invalid token",
            Self::NoConfigName => "Please specify a configuration file",
            Self::InvalidName { .. } => "Invalid configuration name",
            Self::NotFound { .. } => "Configuration not found",
            Self::StoreUnavailable(_) => "Configuration store unavailable",
            Self::InvalidEnvelope { .. } => "Invalid configuration data",
            Self::DecodeFailed { .. } => "Failed to decode configuration",
            Self::Internal { .. } => "Internal server error",
        }
    }

    /// Terminal pipeline state this error ends in.
    pub fn terminal_stage(&self) -> DeliveryStage {
        match self {
            Self::MissingToken | Self::InvalidToken => DeliveryStage::AuthFailed,
            Self::NoConfigName | Self::InvalidName { .. } | Self::NotFound { .. } => {
                DeliveryStage::NotFound
            },
            Self::StoreUnavailable(_) | Self::Internal { .. } => DeliveryStage::Faulted,
            Self::InvalidEnvelope { .. } => DeliveryStage::InvalidEnvelope,
            Self::DecodeFailed { .. } => DeliveryStage::DecodeFailed,
        }
    }

    /// Client errors are logged at warn level, everything else at error.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(DeliveryError::MissingToken.http_status_code(), 401);
        assert_eq!(DeliveryError::InvalidToken.http_status_code(), 403);
        assert_eq!(DeliveryError::NoConfigName.http_status_code(), 404);
        assert_eq!(DeliveryError::NotFound { name: "a".to_string() }.http_status_code(), 404);
        assert_eq!(
            DeliveryError::InvalidEnvelope { message: "eof".to_string() }.http_status_code(),
            500
        );
        assert_eq!(
            DeliveryError::DecodeFailed { message: "bad".to_string() }.http_status_code(),
            500
        );
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = DeliveryError::Internal { message: "secret-ish detail".to_string() };
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.to_string().contains("secret-ish detail"));
    }

    #[test]
    fn test_terminal_stage() {
        assert_eq!(DeliveryError::InvalidToken.terminal_stage(), DeliveryStage::AuthFailed);
        assert_eq!(
            DeliveryError::NotFound { name: "x".to_string() }.terminal_stage(),
            DeliveryStage::NotFound
        );
        assert_eq!(
            DeliveryError::DecodeFailed { message: "x".to_string() }.terminal_stage(),
            DeliveryStage::DecodeFailed
        );
        assert!(DeliveryError::InvalidToken.is_client_error());
        assert!(!DeliveryError::InvalidEnvelope { message: String::new() }.is_client_error());
    }
}
