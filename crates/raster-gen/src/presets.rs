//! Named output sizes.

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, GeneratorResult};

/// Default edge length when neither a preset nor explicit size is given.
pub const DEFAULT_SIZE: u32 = 16000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    Xlarge,
    Xxlarge,
}

impl SizePreset {
    pub fn parse(s: &str) -> GeneratorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(SizePreset::Small),
            "medium" => Ok(SizePreset::Medium),
            "large" => Ok(SizePreset::Large),
            "xlarge" => Ok(SizePreset::Xlarge),
            "xxlarge" => Ok(SizePreset::Xxlarge),
            _ => Err(GeneratorError::unknown("size preset", s)),
        }
    }

    /// Square dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        let side = match self {
            SizePreset::Small => 4000,
            SizePreset::Medium => 8000,
            SizePreset::Large => 16000,
            SizePreset::Xlarge => 20000,
            SizePreset::Xxlarge => 32000,
        };
        (side, side)
    }
}
