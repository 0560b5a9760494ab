//! Key-value store errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a store backend while reading.
///
/// An absent key is not an error: backends return `Ok(None)` for it.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// The store could not be reached (network error, timeout)
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    /// The store answered with a status the backend does not understand
    #[error("Store returned HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The store answered with a body that could not be interpreted
    #[error("Invalid store response: {message}")]
    InvalidResponse { message: String },
}
