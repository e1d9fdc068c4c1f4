//! Error types for raster generation.

use std::path::PathBuf;
use thiserror::Error;

pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Unknown {what} '{value}'")]
    Unknown { what: &'static str, value: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl GeneratorError {
    pub fn unknown(what: &'static str, value: &str) -> Self {
        GeneratorError::Unknown {
            what,
            value: value.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        GeneratorError::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
