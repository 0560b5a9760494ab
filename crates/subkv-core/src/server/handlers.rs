//! Route handlers.

use axum::{
    body::Body,
    extract::State,
    http::Uri,
    response::{Json, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use subkv_types::CONVERT_PARAM_KEY;

use super::{ApiError, AppState};
use crate::auth::Authenticated;
use crate::console::{convert_param_text, list_config_names};
use crate::pipeline::config_name_from_path;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigListResponse {
    pub configs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertParamResponse {
    pub key: String,
    pub value: String,
}

pub async fn deliver_config(
    State(state): State<AppState>,
    Extension(auth): Extension<Authenticated>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let name = config_name_from_path(uri.path())?;
    let delivery = state.pipeline.deliver(auth, &name).await?;

    tracing::info!(
        "Delivered {} ({} bytes, key {})",
        delivery.name,
        delivery.body.len(),
        delivery.resolved_key
    );

    let mut response = Response::new(Body::from(delivery.body));
    *response.headers_mut() = delivery.headers;
    Ok(response)
}

pub async fn list_configs(
    State(state): State<AppState>,
) -> Result<Json<ConfigListResponse>, ApiError> {
    let configs = list_config_names(state.store().as_ref()).await?;
    Ok(Json(ConfigListResponse { configs }))
}

pub async fn convert_param(
    State(state): State<AppState>,
) -> Result<Json<ConvertParamResponse>, ApiError> {
    let value = convert_param_text(state.store().as_ref()).await?;
    Ok(Json(ConvertParamResponse { key: CONVERT_PARAM_KEY.to_string(), value }))
}
