//! Payload decoding.
//!
//! Producers store configuration text base64-encoded inside the envelope.
//! Decoding is as lenient as browser `atob`: ASCII whitespace is ignored,
//! padding is optional and non-zero trailing bits are accepted.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use subkv_types::{ConfigName, DeliveryError, StoredEnvelope, CONVERT_PARAM_KEY};
use thiserror::Error;

use crate::keys::candidate_keys;

const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Shown when the envelope has no operational parameter field.
pub const CONVERT_PARAM_PLACEHOLDER: &str = "Null";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("no payload field for {name}")]
    Missing { name: String },

    #[error("payload field {key} is not a string")]
    NotAString { key: String },

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<PayloadError> for DeliveryError {
    fn from(e: PayloadError) -> Self {
        DeliveryError::DecodeFailed { message: e.to_string() }
    }
}

/// Base64-decode, skipping ASCII whitespace.
pub fn decode_base64(input: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c))
        .collect();
    FORGIVING.decode(compact)
}

/// Decode one base64 layer into UTF-8 text. A leading byte-order mark is dropped.
pub fn decode_text(encoded: &str) -> Result<String, PayloadError> {
    let mut bytes = decode_base64(encoded.as_bytes())?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    Ok(String::from_utf8(bytes)?)
}

/// Find the payload for `name` (verbatim key, then percent-encoded key) and
/// decode it. Null and empty fields count as absent.
pub fn extract_payload(
    envelope: &StoredEnvelope,
    name: &ConfigName,
) -> Result<String, PayloadError> {
    for key in candidate_keys(name) {
        match envelope.field(&key) {
            None | Some(serde_json::Value::Null) => continue,
            Some(serde_json::Value::String(s)) if s.is_empty() => continue,
            Some(serde_json::Value::String(s)) => return decode_text(s),
            Some(_) => return Err(PayloadError::NotAString { key }),
        }
    }
    Err(PayloadError::Missing { name: name.to_string() })
}

/// Decode the operational parameter entry, which is base64 twice over.
///
/// Never fails: each stage's failure is rendered as diagnostic text for the
/// operator console.
pub fn extract_convert_param(envelope: &StoredEnvelope) -> String {
    let encoded = match envelope.field(CONVERT_PARAM_KEY) {
        None | Some(serde_json::Value::Null) => return CONVERT_PARAM_PLACEHOLDER.to_string(),
        Some(serde_json::Value::String(s)) => s,
        Some(_) => return "First decode failed: field is not a string".to_string(),
    };

    let inner = match decode_base64(encoded.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => return format!("First decode failed: {}", e),
    };

    match decode_base64(&inner) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => format!("Second decode failed: {}", e),
        },
        Err(e) => format!("Second decode failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use std::collections::BTreeMap;

    fn envelope_with(fields: &[(&str, serde_json::Value)]) -> StoredEnvelope {
        StoredEnvelope {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
            ..StoredEnvelope::default()
        }
    }

    #[test]
    fn test_round_trip_utf8() {
        for text in ["hello", "", "proxies:\n  - name: 香港 01\n", "emoji 🚀 ok"] {
            let encoded = STANDARD.encode(text);
            assert_eq!(decode_text(&encoded).unwrap(), text);
        }
    }

    #[test]
    fn test_forgiving_input() {
        assert_eq!(decode_text("aGVsbG8").unwrap(), "hello");
        assert_eq!(decode_text("aGVs\nbG8=\n").unwrap(), "hello");
        assert_eq!(decode_text(&STANDARD.encode("\u{feff}bom")).unwrap(), "bom");
    }

    #[test]
    fn test_invalid_base64_and_utf8() {
        assert!(matches!(decode_text("not*base64"), Err(PayloadError::Base64(_))));
        let invalid_utf8 = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode_text(&invalid_utf8), Err(PayloadError::Utf8(_))));
    }

    #[test]
    fn test_extract_payload_either_key_form() {
        let name = ConfigName::new("测试");
        let encoded = STANDARD.encode("hello");

        let raw = envelope_with(&[("测试", serde_json::json!(encoded))]);
        let percent = envelope_with(&[("%E6%B5%8B%E8%AF%95", serde_json::json!(encoded))]);

        assert_eq!(extract_payload(&raw, &name).unwrap(), "hello");
        assert_eq!(extract_payload(&percent, &name).unwrap(), "hello");
    }

    #[test]
    fn test_extract_payload_missing() {
        let envelope = envelope_with(&[("other", serde_json::json!("aGVsbG8="))]);
        let err = extract_payload(&envelope, &ConfigName::new("myconf")).unwrap_err();
        assert!(matches!(err, PayloadError::Missing { .. }));
        assert_eq!(DeliveryError::from(err).http_status_code(), 500);
    }

    #[test]
    fn test_extract_payload_empty_falls_through() {
        let envelope = envelope_with(&[
            ("a b", serde_json::json!("")),
            ("a%20b", serde_json::json!(STANDARD.encode("second"))),
        ]);
        assert_eq!(extract_payload(&envelope, &ConfigName::new("a b")).unwrap(), "second");
    }

    #[test]
    fn test_extract_payload_rejects_non_string() {
        let envelope = envelope_with(&[("myconf", serde_json::json!({"nested": true}))]);
        let err = extract_payload(&envelope, &ConfigName::new("myconf")).unwrap_err();
        assert!(matches!(err, PayloadError::NotAString { .. }));
    }

    #[test]
    fn test_convert_param_double_round_trip() {
        let original = r#"{"sub.yaml":"https://example.com/sub?target=clash"}"#;
        let twice = STANDARD.encode(STANDARD.encode(original));
        let envelope = envelope_with(&[(CONVERT_PARAM_KEY, serde_json::json!(twice))]);

        assert_eq!(extract_convert_param(&envelope), original);
    }

    #[test]
    fn test_convert_param_absent_is_placeholder() {
        assert_eq!(extract_convert_param(&StoredEnvelope::default()), "Null");
        let envelope = envelope_with(&[(CONVERT_PARAM_KEY, serde_json::Value::Null)]);
        assert_eq!(extract_convert_param(&envelope), "Null");
    }

    #[test]
    fn test_convert_param_first_stage_failure() {
        let envelope = envelope_with(&[(CONVERT_PARAM_KEY, serde_json::json!("%%%"))]);
        assert!(extract_convert_param(&envelope).starts_with("First decode failed: "));
    }

    #[test]
    fn test_convert_param_only_wrapped_once_fails_second_stage() {
        // outer layer is valid base64, but what it wraps is not
        let once = STANDARD.encode("definitely *not* base64");
        let envelope = envelope_with(&[(CONVERT_PARAM_KEY, serde_json::json!(once))]);

        let shown = extract_convert_param(&envelope);
        assert!(shown.starts_with("Second decode failed: "), "got {}", shown);
    }
}
