// CORS middleware
use axum::http::Method;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Preflight answers are cached by clients for a day.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Permissive CORS: subscription clients and the operator console may be
/// served from any origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .max_age(PREFLIGHT_MAX_AGE)
}

