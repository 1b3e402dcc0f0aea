//! Error types for overlap-engine operations.

use thiserror::Error;

use crate::event::EventId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// One or more validation failures, in the order they were detected.
    #[error("Invalid event: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Invalid event id: {0}")]
    InvalidId(String),

    /// Failure reported by an [`EventStore`](crate::store::EventStore) backend.
    #[error("Store error: {0}")]
    Store(String),
}

impl EngineError {
    /// Validation messages, or an empty slice for non-validation errors.
    pub fn messages(&self) -> &[String] {
        match self {
            EngineError::Validation(messages) => messages,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
