use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_connect_jwt::ConnectError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddonError {
    #[error("invalid payload: {0}")]
    BadRequest(String),
    #[error("add-on is not installed")]
    NotInstalled,
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ConnectError> for AddonError {
    fn from(value: ConnectError) -> Self {
        match value {
            ConnectError::MissingConfiguration => Self::NotInstalled,
            ConnectError::InvalidRequest(message) => Self::BadRequest(message),
            ConnectError::Signing(message) => Self::Internal(message),
            ConnectError::Transport(err) => Self::Upstream(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AddonError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AddonError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AddonError::NotInstalled => (StatusCode::SERVICE_UNAVAILABLE, "NOT_INSTALLED"),
            AddonError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM"),
            AddonError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
