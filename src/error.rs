use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Viewer error: {0}")]
    Viewer(String),

    #[error("Malformed record on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
