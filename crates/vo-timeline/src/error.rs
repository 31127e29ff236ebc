//! Structured import/validation errors.

use thiserror::Error;

/// An error raised while importing or validating a timeline. Carries a
/// stable `code` and, where known, the originating line number, so the HTTP
/// layer can render `{message, code, line_number}` verbatim as a 400.
#[derive(Debug, Clone, Error)]
#[error("{}", display_message(.message, .line_number))]
pub struct TimelineImportError {
    pub message: String,
    pub line_number: Option<usize>,
    pub code: String,
}

fn display_message(message: &str, line_number: &Option<usize>) -> String {
    match line_number {
        Some(n) => format!("line {n}: {message}"),
        None => message.to_string(),
    }
}

impl TimelineImportError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line_number: None,
            code: code.into(),
        }
    }

    pub fn at_line(message: impl Into<String>, line_number: usize, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line_number: Some(line_number),
            code: code.into(),
        }
    }
}

pub type TimelineResult<T> = Result<T, TimelineImportError>;
