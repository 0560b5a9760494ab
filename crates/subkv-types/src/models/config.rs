//! Server configuration types.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Where stored envelopes are read from.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-process map, optionally seeded from a JSON file.
    Memory {
        #[serde(default)]
        seed_file: Option<PathBuf>,
    },

    /// Cloudflare Workers KV namespace via the REST API.
    Cloudflare {
        account_id: String,
        namespace_id: String,
        api_token: String,
        #[serde(default = "default_cloudflare_base")]
        base_url: String,
    },
}

fn default_cloudflare_base() -> String {
    DEFAULT_CLOUDFLARE_API_BASE.to_string()
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::Memory { seed_file: None }
    }
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory { seed_file } => {
                f.debug_struct("Memory").field("seed_file", seed_file).finish()
            },
            Self::Cloudflare { account_id, namespace_id, base_url, .. } => f
                .debug_struct("Cloudflare")
                .field("account_id", account_id)
                .field("namespace_id", namespace_id)
                .field("api_token", &"<redacted>")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Process-wide configuration, built once at startup and shared by reference.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Secret every request must present as `?token=`.
    pub token: String,

    #[serde(default)]
    pub store: StoreBackend,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl ServerConfig {
    pub fn new(token: impl Into<String>, store: StoreBackend) -> Self {
        Self { host: default_host(), port: default_port(), token: token.into(), store }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations the server cannot safely run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::validation("token", "access token must not be empty"));
        }
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::validation("host", "must be an IP address literal"));
        }
        if let StoreBackend::Cloudflare { account_id, namespace_id, api_token, base_url } =
            &self.store
        {
            for (field, value) in [
                ("store.account_id", account_id),
                ("store.namespace_id", namespace_id),
                ("store.api_token", api_token),
                ("store.base_url", base_url),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::validation(field, "must not be empty"));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token", &"<redacted>")
            .field("store", &self.store)
            .finish()
    }
}
