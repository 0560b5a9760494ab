//! Cloudflare Workers KV backend (REST API).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use subkv_types::{ConfigError, KeyEntry, StoreError};
use url::Url;

use super::KvStore;

/// Longest error body excerpt kept in a `StoreError`.
const MAX_ERROR_BODY: usize = 256;

/// Workers KV refuses these key names, and URL path normalization would turn
/// them into the parent collection.
fn is_unaddressable_key(key: &str) -> bool {
    matches!(key, "." | "..")
}

#[derive(Debug, Deserialize)]
struct ListKeysResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<KeyEntry>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

pub struct CloudflareKvStore {
    http_client: Client,
    namespace_url: Url,
    api_token: String,
}

impl CloudflareKvStore {
    /// Accepts a pre-built `reqwest::Client` so connection pools are shared
    /// with the rest of the process.
    pub fn new(
        http_client: Client,
        base_url: &str,
        account_id: &str,
        namespace_id: &str,
        api_token: &str,
    ) -> Result<Self, ConfigError> {
        let mut namespace_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::validation("store.base_url", &e.to_string()))?;
        namespace_url
            .path_segments_mut()
            .map_err(|_| ConfigError::validation("store.base_url", "URL cannot be a base"))?
            .pop_if_empty()
            .extend(["accounts", account_id, "storage", "kv", "namespaces", namespace_id]);

        Ok(Self { http_client, namespace_url, api_token: api_token.to_string() })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.namespace_url.clone();
        // namespace_url was validated as a base URL in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, StoreError> {
        self.http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable { message: e.to_string() })
    }
}

async fn unexpected_status(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    StoreError::UnexpectedStatus { status, message }
}

#[async_trait]
impl KvStore for CloudflareKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if is_unaddressable_key(key) {
            return Ok(None);
        }
        let response = self.send(self.endpoint(&["values", key])).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .text()
                .await
                .map(Some)
                .map_err(|e| StoreError::InvalidResponse { message: e.to_string() }),
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn list(&self) -> Result<Vec<KeyEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["keys"]);
            if let Some(c) = cursor.as_deref() {
                url.query_pairs_mut().append_pair("cursor", c);
            }

            let response = self.send(url).await?;
            if !response.status().is_success() {
                return Err(unexpected_status(response).await);
            }

            let page: ListKeysResponse = response
                .json()
                .await
                .map_err(|e| StoreError::InvalidResponse { message: e.to_string() })?;
            if !page.success {
                let message = page
                    .errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(StoreError::InvalidResponse { message });
            }

            entries.extend(page.result);
            cursor = page.result_info.and_then(|info| info.cursor).filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} keys from Cloudflare KV", entries.len());
        Ok(entries)
    }

    fn backend_name(&self) -> &'static str {
        "cloudflare"
    }
}
