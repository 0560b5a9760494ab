use serde::{Deserialize, Serialize};

/// States of the delivery pipeline.
///
/// Transitions are strictly forward:
/// `Unauthenticated → Resolving → Parsing → Decoding → Composing → Delivered`.
/// Any stage may instead end in one of the failure states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStage {
    Unauthenticated,
    Resolving,
    Parsing,
    Decoding,
    Composing,
    Delivered,
    AuthFailed,
    NotFound,
    InvalidEnvelope,
    DecodeFailed,
    /// Store fault or unexpected internal error
    Faulted,
}

impl DeliveryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Resolving => "resolving",
            Self::Parsing => "parsing",
            Self::Decoding => "decoding",
            Self::Composing => "composing",
            Self::Delivered => "delivered",
            Self::AuthFailed => "auth_failed",
            Self::NotFound => "not_found",
            Self::InvalidEnvelope => "invalid_envelope",
            Self::DecodeFailed => "decode_failed",
            Self::Faulted => "faulted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::Unauthenticated
                | Self::Resolving
                | Self::Parsing
                | Self::Decoding
                | Self::Composing
        )
    }

    /// The next state on success, `None` once terminal.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Unauthenticated => Some(Self::Resolving),
            Self::Resolving => Some(Self::Parsing),
            Self::Parsing => Some(Self::Decoding),
            Self::Decoding => Some(Self::Composing),
            Self::Composing => Some(Self::Delivered),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
