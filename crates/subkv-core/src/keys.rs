//! Candidate keys for dual-key lookup.
//!
//! Producers may have stored a name before or after percent-encoding it, so
//! both the outer store key and the payload field inside the envelope are
//! tried in the same order: verbatim first, then percent-encoded.

use subkv_types::ConfigName;

/// Ordered keys to try for `name`. The encoded form is omitted when it is
/// identical to the verbatim one.
pub fn candidate_keys(name: &ConfigName) -> Vec<String> {
    let raw = name.as_str().to_string();
    let encoded = name.percent_encoded();
    if encoded == raw {
        vec![raw]
    } else {
        vec![raw, encoded]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name_has_single_candidate() {
        assert_eq!(candidate_keys(&ConfigName::new("myconf")), vec!["myconf"]);
    }

    #[test]
    fn test_non_ascii_name_tries_raw_first() {
        assert_eq!(
            candidate_keys(&ConfigName::new("测试")),
            vec!["测试".to_string(), "%E6%B5%8B%E8%AF%95".to_string()]
        );
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        assert_eq!(
            candidate_keys(&ConfigName::new("my conf")),
            vec!["my conf".to_string(), "my%20conf".to_string()]
        );
    }
}
