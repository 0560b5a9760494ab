//! Core domain models for subkv.

mod auth;
mod config;
mod envelope;
mod name;
mod stage;

pub use auth::AuthOutcome;
pub use config::{ServerConfig, StoreBackend, DEFAULT_CLOUDFLARE_API_BASE};
pub use envelope::{KeyEntry, StoredEnvelope, CONVERT_PARAM_KEY};
pub use name::{encode_component, ConfigName};
pub use stage::DeliveryStage;
