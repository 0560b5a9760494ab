//! # subkv Core
//!
//! Configuration resolution and delivery for subkv.
//!
//! ## Architecture
//!
//! ```text
//! subkv-core/src/
//! ├── auth.rs       # token check against the configured secret
//! ├── keys.rs       # raw / percent-encoded candidate keys
//! ├── resolver.rs   # store lookup with dual-key fallback
//! ├── envelope.rs   # stored JSON envelope parsing
//! ├── payload.rs    # single and double base64 payload decoding
//! ├── headers.rs    # delivery header composition
//! ├── pipeline.rs   # request → delivery orchestration
//! ├── console.rs    # listing + operational parameter view
//! ├── store/        # KvStore trait, memory and Cloudflare KV backends
//! └── server/       # axum router, handlers, middleware
//! ```

pub mod auth;
pub mod console;
pub mod envelope;
pub mod headers;
pub mod keys;
pub mod payload;
pub mod pipeline;
pub mod resolver;
pub mod server;
pub mod store;

pub use auth::{authenticate, Authenticated};
pub use pipeline::{Delivery, DeliveryPipeline};
pub use server::{build_router, AppState};
pub use store::{build_store, CloudflareKvStore, KvStore, MemoryStore};

// Re-export types crate so downstream crates need only one dependency path
pub use subkv_types as types;
