//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] vo_storage::StorageError),

    #[error("Media error: {0}")]
    Media(#[from] vo_media::MediaError),

    #[error("TTS error: {0}")]
    Tts(#[from] vo_tts::TtsError),

    #[error("Demo runner error: {0}")]
    Demo(#[from] vo_demo::DemoError),

    #[error("Queue error: {0}")]
    Queue(#[from] vo_queue::QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if error is retryable (transient infra trouble, not a bad job).
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkerError::Storage(_) | WorkerError::Queue(_) | WorkerError::Io(_))
    }
}
