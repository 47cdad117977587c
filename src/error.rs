// Error types for the sequencing core.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Malformed persisted data, whichever layer noticed it.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
