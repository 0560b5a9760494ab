//! # subkv Types
//!
//! Core types, configuration models, and error definitions for subkv.
//!
//! This crate provides the foundational type system for the subkv workspace:
//!
//! - **`error`** - Typed error hierarchy for delivery, store access and configuration
//! - **`models`** - Domain models (ConfigName, StoredEnvelope, ServerConfig)
//!
//! ## Architecture Role
//!
//! `subkv-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          subkv-types (this crate)
//!                  │
//!                  ▼
//!             subkv-core
//!                  │
//!                  ▼
//!            subkv-server
//! ```

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, DeliveryError, StoreError};

// Re-export core model types
pub use models::{
    encode_component, AuthOutcome, ConfigName, DeliveryStage, KeyEntry, ServerConfig,
    StoreBackend, StoredEnvelope, CONVERT_PARAM_KEY,
};
