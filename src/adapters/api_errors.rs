use crate::domain::error::GatewayError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype so the domain error can be returned straight from axum handlers.
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            GatewayError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            GatewayError::Provider { status, message } => {
                tracing::warn!(status, "mollie api error: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "provider_error",
                    message.clone(),
                )
            }
            GatewayError::Http(err) => {
                tracing::error!("mollie transport error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "provider_error",
                    "payment provider unreachable".to_string(),
                )
            }
            err => {
                tracing::error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
