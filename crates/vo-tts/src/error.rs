//! Errors for TTS profile resolution, synthesis, caching, and rendering.

use thiserror::Error;

pub type TtsResult<T> = Result<T, TtsError>;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("unknown TTS profile {0:?}")]
    UnknownProfile(String),

    #[error("TTS request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("TTS endpoint returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("media processing error: {0}")]
    Media(#[from] vo_media::MediaError),

    #[error("storage error: {0}")]
    Storage(#[from] vo_storage::StorageError),

    #[error("demo runner error: {0}")]
    Demo(#[from] vo_demo::DemoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
