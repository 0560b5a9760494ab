//! Read-only operator views: entry listing and the operational parameter.

use percent_encoding::percent_decode_str;
use subkv_types::{StoreError, CONVERT_PARAM_KEY};

use crate::envelope::decode_envelope;
use crate::payload::{extract_convert_param, CONVERT_PARAM_PLACEHOLDER};
use crate::store::KvStore;

/// Every stored key, percent-decoded for display where possible, sorted.
pub async fn list_config_names(store: &dyn KvStore) -> Result<Vec<String>, StoreError> {
    let mut names: Vec<String> = store
        .list()
        .await?
        .into_iter()
        .map(|entry| match percent_decode_str(&entry.name).decode_utf8() {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => entry.name,
        })
        .collect();
    names.sort();
    Ok(names)
}

/// Double-decoded operational parameter text.
///
/// Only a store fault is an error; everything else becomes display text.
pub async fn convert_param_text(store: &dyn KvStore) -> Result<String, StoreError> {
    let Some(raw) = store.get(CONVERT_PARAM_KEY).await? else {
        return Ok(CONVERT_PARAM_PLACEHOLDER.to_string());
    };
    Ok(match decode_envelope(&raw) {
        Ok(envelope) => extract_convert_param(&envelope),
        Err(e) => format!("Envelope parse failed: {}", e),
    })
}
