//! Tile coordinates and crop boxes within a pyramid level.

use serde::{Deserialize, Serialize};

/// A tile coordinate (level/col/row).
///
/// Level 0 is the coarsest level of the pyramid; the highest level is the
/// native resolution of the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub level: u32,
    pub col: u32,
    pub row: u32,
}

impl TileCoord {
    pub fn new(level: u32, col: u32, row: u32) -> Self {
        Self { level, col, row }
    }

    /// File name of the tile inside its level directory (`{col}_{row}.{ext}`).
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.col, self.row, extension)
    }

    /// Path of the tile relative to the pyramid root (`{level}/{col}_{row}.{ext}`).
    pub fn relative_path(&self, extension: &str) -> String {
        format!("{}/{}", self.level, self.file_name(extension))
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}_{}", self.level, self.col, self.row)
    }
}

/// Half-open crop box `[x1, x2) x [y1, y2)` in level pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl TileBounds {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the box lies within `[0, width] x [0, height]`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2 && self.x2 <= width && self.y2 <= height
    }
}
