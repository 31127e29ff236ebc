//! Errors for action validation and demo execution.

use thiserror::Error;

pub type DemoResult<T> = Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("invalid action {action_id:?}: {message}")]
    InvalidAction { action_id: String, message: String },

    #[error("browser dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("browser session error: {0}")]
    Session(String),

    #[error("action {action_id:?} timed out after {timeout_ms}ms")]
    ActionTimeout { action_id: String, timeout_ms: i64 },

    #[error("media processing error: {0}")]
    Media(#[from] vo_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How an action failure should be classified for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Timeout,
    TransientBrowser,
    TransientNetwork,
    ActionError,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::TransientBrowser => "transient_browser",
            Self::TransientNetwork => "transient_network",
            Self::ActionError => "action_error",
        }
    }

    /// Classify a session-layer error message using the same substring
    /// heuristics a browser-automation driver's own error text permits:
    /// most backends don't give typed errors across the wire, just a
    /// message.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("net::") || lower.contains("dns") || lower.contains("connection") {
            Self::TransientNetwork
        } else if lower.contains("detached") || lower.contains("crashed") || lower.contains("closed") {
            Self::TransientBrowser
        } else {
            Self::ActionError
        }
    }

    /// Whether a retry makes sense for this class. Plain action errors
    /// (bad selector, stale element) won't be fixed by trying again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ActionError)
    }
}
