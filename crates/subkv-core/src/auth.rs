//! Caller authentication against the configured access token.

use subtle::ConstantTimeEq;
use subkv_types::{AuthOutcome, DeliveryError};

/// Proof that a request passed [`require`]. Only this module can create it.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    _private: (),
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Classify a caller-supplied token.
///
/// An empty token counts as missing.
pub fn authenticate(token: Option<&str>, secret: &str) -> AuthOutcome {
    match token {
        None | Some("") => AuthOutcome::Missing,
        Some(t) if constant_time_compare(t, secret) => AuthOutcome::Valid,
        Some(_) => AuthOutcome::Invalid,
    }
}

/// Authenticate or fail with the matching delivery error.
pub fn require(token: Option<&str>, secret: &str) -> Result<Authenticated, DeliveryError> {
    authenticate(token, secret).into_result()?;
    Ok(Authenticated { _private: () })
}

/// Pull the `token` parameter out of a raw query string.
pub fn token_from_query(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("ab", "abc"));
    }

    #[test]
    fn test_authenticate_outcomes() {
        assert_eq!(authenticate(Some("s3cret"), "s3cret"), AuthOutcome::Valid);
        assert_eq!(authenticate(Some("S3CRET"), "s3cret"), AuthOutcome::Invalid);
        assert_eq!(authenticate(Some("s3cret "), "s3cret"), AuthOutcome::Invalid);
        assert_eq!(authenticate(Some(""), "s3cret"), AuthOutcome::Missing);
        assert_eq!(authenticate(None, "s3cret"), AuthOutcome::Missing);
    }

    #[test]
    fn test_require_maps_to_errors() {
        assert!(require(Some("t"), "t").is_ok());
        assert_eq!(require(None, "t").unwrap_err(), DeliveryError::MissingToken);
        assert_eq!(require(Some("x"), "t").unwrap_err(), DeliveryError::InvalidToken);
    }

    #[test]
    fn test_token_from_query() {
        assert_eq!(token_from_query(Some("token=abc")), Some("abc".to_string()));
        assert_eq!(token_from_query(Some("a=1&token=a%2Bb")), Some("a+b".to_string()));
        assert_eq!(token_from_query(Some("tok=abc")), None);
        assert_eq!(token_from_query(None), None);
    }
}
