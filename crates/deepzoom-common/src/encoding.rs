//! Tile geometry and tile encoding definitions.

use serde::{Deserialize, Serialize};

use crate::error::{PyramidError, PyramidResult};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default overlap in pixels on each tile edge.
pub const DEFAULT_OVERLAP: u32 = 1;

/// Encoding used for persisted tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TileEncoding {
    /// Lossy JPEG at a fixed quality.
    #[default]
    Jpeg,
    /// Lossless PNG, best compression.
    Png,
    /// Lossy WebP.
    #[serde(rename = "webp")]
    WebP,
}

impl TileEncoding {
    /// Parse from string (case-insensitive). Accepts format ids and common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Format identifier written into the descriptor. Also the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// File extension for tiles in this encoding.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for TileEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TileEncoding {
    type Err = PyramidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            PyramidError::InvalidConfig(format!(
                "unknown tile encoding '{}' (expected jpg, png or webp)",
                s
            ))
        })
    }
}

/// Tile geometry shared by every level of a pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGeometry {
    /// Tile edge length before overlap is added.
    pub tile_size: u32,
    /// Extra pixels included on each tile edge.
    pub overlap: u32,
    /// Encoding of persisted tiles.
    pub encoding: TileEncoding,
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            overlap: DEFAULT_OVERLAP,
            encoding: TileEncoding::default(),
        }
    }
}

impl TileGeometry {
    pub fn new(tile_size: u32, overlap: u32, encoding: TileEncoding) -> Self {
        Self {
            tile_size,
            overlap,
            encoding,
        }
    }

    pub fn validate(&self) -> PyramidResult<()> {
        if self.tile_size == 0 {
            return Err(PyramidError::InvalidConfig(
                "tile_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
