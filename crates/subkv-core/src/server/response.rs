use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use subkv_types::DeliveryError;

/// HTTP face of a [`DeliveryError`]: status per error kind, plain-text body,
/// permissive CORS header.
#[derive(Debug)]
pub struct ApiError(pub DeliveryError);

impl From<DeliveryError> for ApiError {
    fn from(e: DeliveryError) -> Self {
        Self(e)
    }
}

impl From<subkv_types::StoreError> for ApiError {
    fn from(e: subkv_types::StoreError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_client_error() {
            tracing::warn!("Request rejected: {}", err);
        } else {
            tracing::error!("Request failed [{}]: {}", err.terminal_stage(), err);
        }

        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            ],
            err.public_message(),
        )
            .into_response()
    }
}
