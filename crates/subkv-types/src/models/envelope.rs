//! Stored envelope models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed store key of the operational parameter entry.
pub const CONVERT_PARAM_KEY: &str = "CONVERT_PARAM";

/// The JSON object stored per key.
///
/// ```json
/// {
///   "myconf": "<base64 payload>",
///   "update_time": "2024-01-01 00:00:00",
///   "headers": { "subscription-userinfo": "upload=1; download=2; total=3; expire=4" }
/// }
/// ```
///
/// Payload fields are keyed by the configuration name (raw or percent-encoded)
/// and collected into `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredEnvelope {
    /// Delivery headers captured by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Producer timestamp, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,

    /// Payload fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl StoredEnvelope {
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// One entry of a store listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub name: String,
}

impl KeyEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
