//! Project Store error types.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("project not found: {0}")]
    NotFound(String),

    #[error("project already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt project document at {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl StorageError {
    pub fn not_found(project_id: impl Into<String>) -> Self {
        Self::NotFound(project_id.into())
    }

    pub fn already_exists(project_id: impl Into<String>) -> Self {
        Self::AlreadyExists(project_id.into())
    }

    pub fn corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
