use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use oncolens_ner::NerError;

/// Errors surfaced to HTTP callers as `{"success": false, "error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
        (status, Json(json!({ "success": false, "error": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Engine failures keep their message; only the status is chosen here.
impl From<NerError> for ApiError {
    fn from(e: NerError) -> Self {
        match e {
            NerError::TextTooLong { .. } | NerError::BatchTooLarge { .. } => {
                ApiError::PayloadTooLarge(e.to_string())
            }
            NerError::UnknownModel(_) | NerError::InvalidInput(_) => ApiError::BadRequest(e.to_string()),
            NerError::Pattern { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::PayloadTooLarge("x".into()).status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_engine_errors_map_to_status() {
        let too_long: ApiError = NerError::TextTooLong { length: 11, max: 10 }.into();
        assert_eq!(too_long.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_long.to_string(), "Text exceeds maximum length of 10 characters");

        let batch: ApiError = NerError::BatchTooLarge { size: 3, max: 2 }.into();
        assert_eq!(batch.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let model: ApiError = NerError::UnknownModel("GPT".into()).into();
        assert_eq!(model.status(), StatusCode::BAD_REQUEST);
        assert_eq!(model.to_string(), "Unknown model variant: GPT");

        let pattern: ApiError = NerError::Pattern { category: "AGE", message: "bad".into() }.into();
        assert_eq!(pattern.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_is_verbatim() {
        assert_eq!(ApiError::BadRequest("Invalid analysis type".into()).to_string(), "Invalid analysis type");
    }
}
