use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Characters escaped by `encodeURIComponent`: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `input` the way subscription producers and clients do
/// (`encodeURIComponent` semantics, UTF-8 bytes).
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// A configuration identifier, already percent-decoded from the request path.
///
/// Storage is case- and encoding-sensitive, so the name is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigName(String);

impl ConfigName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Decode a raw (percent-encoded) path segment.
    pub fn from_path_segment(segment: &str) -> Result<Self, DeliveryError> {
        percent_decode_str(segment)
            .decode_utf8()
            .map(|decoded| Self(decoded.into_owned()))
            .map_err(|e| DeliveryError::InvalidName { message: e.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn percent_encoded(&self) -> String {
        encode_component(&self.0)
    }
}

impl std::fmt::Display for ConfigName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConfigName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_non_ascii() {
        assert_eq!(encode_component("测试"), "%E6%B5%8B%E8%AF%95");
    }

    #[test]
    fn test_encode_keeps_unreserved_marks() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_component("a b/c?d&e=f"), "a%20b%2Fc%3Fd%26e%3Df");
    }

    #[test]
    fn test_from_path_segment_decodes() {
        let name = ConfigName::from_path_segment("%E6%B5%8B%E8%AF%95").unwrap();
        assert_eq!(name.as_str(), "测试");
        assert_eq!(name.percent_encoded(), "%E6%B5%8B%E8%AF%95");
    }

    #[test]
    fn test_from_path_segment_rejects_invalid_utf8() {
        let err = ConfigName::from_path_segment("%FF%FE").unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }
}
