//! HTTP surface: router, handlers and middleware.

mod handlers;
pub mod middleware;
mod response;


pub use handlers::{ConfigListResponse, ConvertParamResponse};
pub use response::ApiError;

use axum::{extract::Request, middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use subkv_types::ServerConfig;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::pipeline::DeliveryPipeline;
use crate::store::KvStore;

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pipeline: Arc<DeliveryPipeline>,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>, store: Arc<dyn KvStore>) -> Self {
        Self { config, pipeline: Arc::new(DeliveryPipeline::new(store)) }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        self.pipeline.store()
    }
}

/// Build the full router. Every route requires `?token=`; CORS preflight is
/// answered before authentication.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Operator console backend
        .route("/api/configs", get(handlers::list_configs))
        .route("/api/convert-param", get(handlers::convert_param))
        // Everything else is a configuration download
        .fallback(handlers::deliver_config)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(middleware::cors_layer())
                .layer(from_fn_with_state(state.clone(), middleware::auth_middleware)),
        )
        .with_state(state)
}

/// Request span without the query string, which carries the access token.
fn request_span(request: &Request) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path()
    )
}
