//! Error types for the tandem ecosystem.

use thiserror::Error;

/// Errors that can occur in tandem operations.
#[derive(Error, Debug)]
pub enum TandemError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid task transition: {0}")]
    Transition(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for tandem operations.
pub type TandemResult<T> = Result<T, TandemError>;
