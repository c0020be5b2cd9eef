//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glyco_core::GlycoError;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Measurements outside the accepted ranges.
    InvalidInput(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<GlycoError> for ApiError {
    fn from(err: GlycoError) -> Self {
        match err {
            GlycoError::Input(e) => ApiError::InvalidInput(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
