//! Typed error definitions for subkv.
//!
//! Each domain gets its own enum so callers can match on exactly the failures
//! they care about:
//!
//! - **`DeliveryError`** - request-level failures of the delivery pipeline
//! - **`StoreError`** - key-value store read failures
//! - **`ConfigError`** - startup configuration failures

mod config;
mod delivery;
mod store;

pub use config::ConfigError;
pub use delivery::DeliveryError;
pub use store::StoreError;
