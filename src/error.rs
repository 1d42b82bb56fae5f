//! Error types for age-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgeError {
    #[error("Invalid event result: {0}")]
    InvalidResult(String),

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid event transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgeError>;
