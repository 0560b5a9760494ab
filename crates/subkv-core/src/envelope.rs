//! Stored envelope parsing.

use subkv_types::{DeliveryError, StoredEnvelope};

/// Parse a raw store value into a [`StoredEnvelope`].
///
/// Fails closed: the value must be a JSON object, `headers` (when present)
/// must map names to strings, and `update_time` must be a string.
pub fn decode_envelope(raw: &str) -> Result<StoredEnvelope, DeliveryError> {
    serde_json::from_str(raw).map_err(|e| DeliveryError::InvalidEnvelope { message: e.to_string() })
}
