use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{require, token_from_query};
use crate::server::{ApiError, AppState};

/// Require `?token=` on every request and hand the proof to handlers as a
/// request extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    // path only: the query carries the token
    tracing::info!("Request: {} {}", method, request.uri().path());

    let token = token_from_query(request.uri().query());
    let proof = require(token.as_deref(), &state.config.token)?;

    request.extensions_mut().insert(proof);
    Ok(next.run(request).await)
}
