//! Delivery header composition.
//!
//! Order matters: base headers, then every producer-declared header
//! verbatim, then the subscription defaults only where the name is still
//! absent. Producer values always win over defaults.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use subkv_types::{ConfigName, DeliveryError, StoredEnvelope};

pub const SUBSCRIPTION_USERINFO: &str = "subscription-userinfo";
pub const PROFILE_UPDATE_INTERVAL: &str = "profile-update-interval";
pub const PROFILE_UPDATE_TIMESTAMP: &str = "profile-update-timestamp";

pub const DEFAULT_SUBSCRIPTION_USERINFO: &str = "upload=0; download=0; total=0; expire=0";
pub const DEFAULT_UPDATE_INTERVAL_HOURS: &str = "24";
pub const CONFIG_CONTENT_TYPE: &str = "text/yaml; charset=utf-8";

/// Content type, permissive CORS and cache-disabling directives.
pub fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONFIG_CONTENT_TYPE));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}

/// `attachment; filename*=UTF-8''<percent-encoded name>`
pub fn content_disposition(name: &ConfigName) -> String {
    format!("attachment; filename*=UTF-8''{}", name.percent_encoded())
}

fn is_http_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Build the response headers for a resolved configuration.
///
/// `now` is the Unix timestamp (seconds) used for `profile-update-timestamp`.
/// A declared header that is not a legal HTTP name/value makes the envelope
/// invalid.
pub fn compose_headers(
    envelope: &StoredEnvelope,
    name: &ConfigName,
    now: i64,
) -> Result<HeaderMap, DeliveryError> {
    let mut headers = base_headers();

    if let Some(declared) = &envelope.headers {
        for (key, value) in declared {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                DeliveryError::InvalidEnvelope { message: format!("header name {:?}: {}", key, e) }
            })?;
            let trimmed = value.trim_matches(is_http_whitespace);
            let header_value = HeaderValue::from_bytes(trimmed.as_bytes()).map_err(|e| {
                DeliveryError::InvalidEnvelope { message: format!("header {}: {}", header_name, e) }
            })?;
            headers.insert(header_name, header_value);
        }
    }

    let defaults = [
        (
            HeaderName::from_static(SUBSCRIPTION_USERINFO),
            DEFAULT_SUBSCRIPTION_USERINFO.to_string(),
        ),
        (
            HeaderName::from_static(PROFILE_UPDATE_INTERVAL),
            DEFAULT_UPDATE_INTERVAL_HOURS.to_string(),
        ),
        (HeaderName::from_static(PROFILE_UPDATE_TIMESTAMP), now.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(name)),
    ];
    for (key, value) in defaults {
        if headers.contains_key(&key) {
            continue;
        }
        // defaults are ASCII: digits, fixed text, or percent-encoded output
        let value = HeaderValue::from_str(&value)
            .map_err(|e| DeliveryError::Internal { message: format!("default {}: {}", key, e) })?;
        headers.insert(key, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn envelope_with_headers(pairs: &[(&str, &str)]) -> StoredEnvelope {
        let headers: BTreeMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        StoredEnvelope { headers: Some(headers), ..StoredEnvelope::default() }
    }

    fn get<'a>(headers: &'a HeaderMap, key: &str) -> Option<&'a str> {
        headers.get(key).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_defaults_fill_empty_envelope() {
        let headers =
            compose_headers(&StoredEnvelope::default(), &ConfigName::new("myconf"), 1_700_000_000)
                .unwrap();

        assert_eq!(get(&headers, "content-type"), Some("text/yaml; charset=utf-8"));
        assert_eq!(get(&headers, "access-control-allow-origin"), Some("*"));
        assert_eq!(get(&headers, "cache-control"), Some("no-cache, no-store, must-revalidate"));
        assert_eq!(get(&headers, "pragma"), Some("no-cache"));
        assert_eq!(get(&headers, "expires"), Some("0"));
        assert_eq!(
            get(&headers, "subscription-userinfo"),
            Some("upload=0; download=0; total=0; expire=0")
        );
        assert_eq!(get(&headers, "profile-update-interval"), Some("24"));
        assert_eq!(get(&headers, "profile-update-timestamp"), Some("1700000000"));
        assert_eq!(
            get(&headers, "content-disposition"),
            Some("attachment; filename*=UTF-8''myconf")
        );
    }

    #[test]
    fn test_declared_interval_wins() {
        let envelope = envelope_with_headers(&[("profile-update-interval", "12")]);
        let headers = compose_headers(&envelope, &ConfigName::new("a"), 0).unwrap();

        let values: Vec<_> = headers.get_all("profile-update-interval").iter().collect();
        assert_eq!(values, vec!["12"]);
    }

    #[test]
    fn test_declared_header_names_are_case_insensitive() {
        let envelope = envelope_with_headers(&[
            ("Subscription-Userinfo", "upload=1; download=2; total=3; expire=4"),
            ("Content-Disposition", "attachment; filename=clash.yaml"),
        ]);
        let headers = compose_headers(&envelope, &ConfigName::new("a"), 0).unwrap();

        assert_eq!(
            get(&headers, "subscription-userinfo"),
            Some("upload=1; download=2; total=3; expire=4")
        );
        assert_eq!(get(&headers, "content-disposition"), Some("attachment; filename=clash.yaml"));
        assert_eq!(headers.get_all("content-disposition").iter().count(), 1);
    }

    #[test]
    fn test_declared_headers_override_base() {
        let envelope = envelope_with_headers(&[("content-type", "text/plain"), ("x-custom", "1")]);
        let headers = compose_headers(&envelope, &ConfigName::new("a"), 0).unwrap();

        assert_eq!(get(&headers, "content-type"), Some("text/plain"));
        assert_eq!(get(&headers, "x-custom"), Some("1"));
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let headers =
            compose_headers(&StoredEnvelope::default(), &ConfigName::new("测试"), 0).unwrap();
        assert_eq!(
            get(&headers, "content-disposition"),
            Some("attachment; filename*=UTF-8''%E6%B5%8B%E8%AF%95")
        );
    }

    #[test]
    fn test_declared_value_is_trimmed() {
        let envelope = envelope_with_headers(&[("x-custom", "  padded\t")]);
        let headers = compose_headers(&envelope, &ConfigName::new("a"), 0).unwrap();
        assert_eq!(get(&headers, "x-custom"), Some("padded"));
    }

    #[test]
    fn test_illegal_header_fails_envelope() {
        let envelope = envelope_with_headers(&[("bad header", "1")]);
        let err = compose_headers(&envelope, &ConfigName::new("a"), 0).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidEnvelope { .. }));

        let envelope = envelope_with_headers(&[("x-ok", "line\nbreak")]);
        assert!(compose_headers(&envelope, &ConfigName::new("a"), 0).is_err());
    }
}
