//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] vo_storage::StorageError),

    #[error("timeline error: {0}")]
    Timeline(#[from] vo_timeline::TimelineImportError),

    #[error("TTS error: {0}")]
    Tts(#[from] vo_tts::TtsError),

    #[error("demo runner error: {0}")]
    Demo(#[from] vo_demo::DemoError),

    #[error("media error: {0}")]
    Media(#[from] vo_media::MediaError),

    #[error("queue error: {0}")]
    Queue(#[from] vo_queue::QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::Timeline(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Storage(vo_storage::StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Internal(_)
            | ApiError::Storage(_)
            | ApiError::Tts(_)
            | ApiError::Demo(_)
            | ApiError::Media(_)
            | ApiError::Queue(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_number: Option<usize>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (detail, code, line_number) = match &self {
            ApiError::Timeline(e) => (e.message.clone(), Some(e.code.clone()), e.line_number),
            ApiError::Internal(_)
            | ApiError::Storage(_)
            | ApiError::Tts(_)
            | ApiError::Demo(_)
            | ApiError::Media(_)
            | ApiError::Queue(_)
            | ApiError::Io(_) => {
                let detail = if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                };
                (detail, None, None)
            }
            _ => (self.to_string(), None, None),
        };

        let body = ErrorResponse { detail, code, line_number };
        (status, Json(body)).into_response()
    }
}
