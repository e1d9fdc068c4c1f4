//! Level planning for power-of-two Deep Zoom pyramids.
//!
//! The top level is the native resolution of the source; each step down
//! halves both dimensions (rounding up) until the largest side is one pixel.
//! All arithmetic is done on integers so that level counts never suffer
//! from floating point `log2` rounding at exact powers of two.

use deepzoom_common::{PyramidError, PyramidResult};
use serde::{Deserialize, Serialize};

/// Dimensions of a single pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: u32,
    pub width: u32,
    pub height: u32,
}

/// The complete level plan for one source raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidPlan {
    pub source_width: u32,
    pub source_height: u32,
    pub levels: Vec<LevelSpec>,
}

impl PyramidPlan {
    /// Plan a pyramid for a source of the given size.
    pub fn new(source_width: u32, source_height: u32) -> PyramidResult<Self> {
        validate_dimensions(source_width, source_height)?;

        let count = num_levels(source_width, source_height);
        let levels = (0..count)
            .map(|level| {
                let (width, height) = level_dimensions(source_width, source_height, level, count);
                LevelSpec {
                    level,
                    width,
                    height,
                }
            })
            .collect();

        Ok(Self {
            source_width,
            source_height,
            levels,
        })
    }

    pub fn num_levels(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Index of the native-resolution level.
    pub fn max_level(&self) -> u32 {
        self.num_levels() - 1
    }

    pub fn level(&self, level: u32) -> Option<&LevelSpec> {
        self.levels.get(level as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelSpec> {
        self.levels.iter()
    }
}

/// Reject zero-sized sources before any planning happens.
pub fn validate_dimensions(width: u32, height: u32) -> PyramidResult<()> {
    if width == 0 || height == 0 {
        return Err(PyramidError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// `ceil(log2(max(width, height))) + 1`, or 1 when the largest side is <= 1.
pub fn num_levels(width: u32, height: u32) -> u32 {
    let max_dimension = width.max(height);
    if max_dimension <= 1 {
        return 1;
    }
    // Bits needed to represent max_dimension - 1 is ceil(log2(max_dimension)).
    let ceil_log2 = u32::BITS - (max_dimension - 1).leading_zeros();
    ceil_log2 + 1
}

/// Pixel dimensions of `level` in a pyramid of `num_levels` levels.
///
/// `scale = 2^(max_level - level)`, each side is `ceil(side / scale)`.
pub fn level_dimensions(width: u32, height: u32, level: u32, num_levels: u32) -> (u32, u32) {
    let max_level = num_levels.saturating_sub(1);
    let shift = max_level.saturating_sub(level);
    (ceil_shift(width, shift), ceil_shift(height, shift))
}

#[inline]
fn ceil_shift(value: u32, shift: u32) -> u32 {
    let scale = 1u64 << shift;
    ((value as u64 + scale - 1) >> shift) as u32
}
