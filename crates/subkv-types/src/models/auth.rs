use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Result of checking a caller-supplied token against the configured secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
    Missing,
    Invalid,
    Valid,
}

impl AuthOutcome {
    /// Turn a rejected outcome into the error the request must fail with.
    pub fn into_result(self) -> Result<(), DeliveryError> {
        match self {
            Self::Missing => Err(DeliveryError::MissingToken),
            Self::Invalid => Err(DeliveryError::InvalidToken),
            Self::Valid => Ok(()),
        }
    }
}
