//! Error types for pyramid construction.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using PyramidError.
pub type PyramidResult<T> = Result<T, PyramidError>;

/// Primary error type for pyramid builds.
#[derive(Debug, Error)]
pub enum PyramidError {
    // === Input Errors ===
    #[error("Invalid source dimensions {width}x{height}: both sides must be > 0")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Source raster unreadable: {0}")]
    SourceUnreadable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Build Errors ===
    #[error("Output root {path} unavailable: {message}")]
    OutputUnavailable { path: PathBuf, message: String },

    #[error("Resampling failed at level {level}: {message}")]
    Resample { level: u32, message: String },

    #[error("Tile encoding failed for {tile}: {message}")]
    Encode { tile: String, message: String },

    #[error("Failed to write tile {path}: {message}")]
    TileWrite { path: PathBuf, message: String },

    #[error("Failed to write descriptor {path}: {message}")]
    DescriptorWrite { path: PathBuf, message: String },

    #[error("Failed to serialize descriptor: {0}")]
    DescriptorSerialize(String),

    #[error("Invalid descriptor document: {0}")]
    DescriptorParse(String),

    // === Fast Path ===
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("External pyramid tool failed: {0}")]
    ExternalTool(String),
}

impl PyramidError {
    /// Whether a caller should retry the build with the manual builder.
    ///
    /// Only a missing fast-path capability qualifies. Everything else is
    /// surfaced to the caller.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(self, PyramidError::CapabilityUnavailable(_))
    }

    /// Short machine-readable identifier, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PyramidError::InvalidDimensions { .. } => "invalid_dimensions",
            PyramidError::SourceUnreadable(_) => "source_unreadable",
            PyramidError::InvalidConfig(_) => "invalid_config",
            PyramidError::OutputUnavailable { .. } => "output_unavailable",
            PyramidError::Resample { .. } => "resample",
            PyramidError::Encode { .. } => "encode",
            PyramidError::TileWrite { .. } => "tile_write",
            PyramidError::DescriptorWrite { .. } => "descriptor_write",
            PyramidError::DescriptorSerialize(_) => "descriptor_serialize",
            PyramidError::DescriptorParse(_) => "descriptor_parse",
            PyramidError::CapabilityUnavailable(_) => "capability_unavailable",
            PyramidError::ExternalTool(_) => "external_tool",
        }
    }

    pub fn output_unavailable(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::OutputUnavailable {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn tile_write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::TileWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn descriptor_write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::DescriptorWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for PyramidError {
    fn from(err: serde_json::Error) -> Self {
        PyramidError::DescriptorParse(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_capability_unavailable_triggers_fallback() {
        assert!(PyramidError::CapabilityUnavailable("vips".into()).is_fallback_trigger());
        assert!(!PyramidError::Resample {
            level: 3,
            message: "boom".into()
        }
        .is_fallback_trigger());
        assert!(!PyramidError::output_unavailable("/nope", "denied").is_fallback_trigger());
        assert!(!PyramidError::ExternalTool("exit 1".into()).is_fallback_trigger());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = PyramidError::InvalidDimensions {
            width: 0,
            height: 12,
        };
        assert_eq!(
            err.to_string(),
            "Invalid source dimensions 0x12: both sides must be > 0"
        );

        let err = PyramidError::tile_write("out/3/0_0.jpg", "disk full");
        assert!(err.to_string().contains("out/3/0_0.jpg"));
        assert_eq!(err.kind(), "tile_write");
    }
}
