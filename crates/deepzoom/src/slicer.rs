//! Slices a level raster into a grid of overlapping tiles.
//!
//! ```text
//!        x - overlap        x + tile_size + overlap
//!            │  x           │
//!            ▼  ▼           ▼
//!          ┌──┬────────────┬──┐
//!          │  │            │  │  <- y - overlap
//!          ├──┼────────────┼──┤
//!          │  │  (col,row) │  │
//!          ├──┼────────────┼──┤
//!          │  │            │  │  <- y + tile_size + overlap
//!          └──┴────────────┴──┘
//! ```
//!
//! Boxes are clamped to the level raster, so tiles in the first row/column
//! lose their leading overlap and tiles in the last row/column may be
//! narrower than `tile_size`.

use std::path::{Path, PathBuf};

use deepzoom_common::{PyramidError, PyramidResult, TileBounds, TileCoord, TileGeometry};
use image::DynamicImage;
use rayon::prelude::*;
use tracing::debug;

use crate::raster::{EncodeOptions, RasterOps};
use crate::storage::TileStorage;

/// Tile grid geometry of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub level: u32,
    pub level_width: u32,
    pub level_height: u32,
    pub tile_size: u32,
    pub overlap: u32,
    pub cols: u32,
    pub rows: u32,
}

impl TileGrid {
    pub fn new(level: u32, level_width: u32, level_height: u32, tile_size: u32, overlap: u32) -> Self {
        Self {
            level,
            level_width,
            level_height,
            tile_size,
            overlap,
            cols: level_width.div_ceil(tile_size),
            rows: level_height.div_ceil(tile_size),
        }
    }

    pub fn from_geometry(level: u32, level_width: u32, level_height: u32, geometry: &TileGeometry) -> Self {
        Self::new(level, level_width, level_height, geometry.tile_size, geometry.overlap)
    }

    pub fn tile_count(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }

    /// Crop box of tile `(col, row)`.
    pub fn bounds(&self, col: u32, row: u32) -> TileBounds {
        // u64 so that x + tile_size + overlap cannot wrap near u32::MAX
        let x = col as u64 * self.tile_size as u64;
        let y = row as u64 * self.tile_size as u64;
        let overlap = self.overlap as u64;
        let span = self.tile_size as u64 + overlap;

        TileBounds {
            x1: x.saturating_sub(overlap) as u32,
            y1: y.saturating_sub(overlap) as u32,
            x2: (x + span).min(self.level_width as u64) as u32,
            y2: (y + span).min(self.level_height as u64) as u32,
        }
    }

    /// Every tile of the level, column by column.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.cols)
            .flat_map(move |col| (0..self.rows).map(move |row| TileCoord::new(self.level, col, row)))
    }
}

/// Crops, encodes and persists the tiles of a level.
pub struct TileSlicer<'a> {
    ops: &'a dyn RasterOps,
    storage: &'a dyn TileStorage,
    options: EncodeOptions,
    parallel: bool,
}

impl<'a> TileSlicer<'a> {
    pub fn new(
        ops: &'a dyn RasterOps,
        storage: &'a dyn TileStorage,
        options: EncodeOptions,
        parallel: bool,
    ) -> Self {
        Self {
            ops,
            storage,
            options,
            parallel,
        }
    }

    /// Directory holding the tiles of `level`.
    pub fn level_dir(output_root: &Path, level: u32) -> PathBuf {
        output_root.join(level.to_string())
    }

    /// Write every tile of `grid` from `raster` under `output_root`.
    ///
    /// Returns the number of tiles written. The level directory is created
    /// before the first tile; each tile path is written by exactly one worker.
    pub fn slice(&self, raster: &DynamicImage, grid: &TileGrid, output_root: &Path) -> PyramidResult<u64> {
        let level_dir = Self::level_dir(output_root, grid.level);
        self.storage
            .create_dir_all(&level_dir)
            .map_err(|e| PyramidError::tile_write(&level_dir, e))?;

        if self.parallel {
            let coords: Vec<TileCoord> = grid.coords().collect();
            coords
                .par_iter()
                .try_for_each(|tile| self.write_tile(raster, grid, *tile, &level_dir))?;
        } else {
            for tile in grid.coords() {
                self.write_tile(raster, grid, tile, &level_dir)?;
            }
        }

        Ok(grid.tile_count())
    }

    fn write_tile(
        &self,
        raster: &DynamicImage,
        grid: &TileGrid,
        tile: TileCoord,
        level_dir: &Path,
    ) -> PyramidResult<()> {
        let bounds = grid.bounds(tile.col, tile.row);
        let encode_err = |message: String| PyramidError::Encode {
            tile: tile.to_string(),
            message,
        };

        let cropped = self.ops.crop(raster, bounds).map_err(encode_err)?;
        let bytes = self.ops.encode(&cropped, &self.options).map_err(encode_err)?;

        let path = level_dir.join(tile.file_name(self.options.encoding.extension()));
        self.storage
            .write_file(&path, &bytes)
            .map_err(|e| PyramidError::tile_write(&path, e))?;

        debug!(
            tile = %tile,
            x1 = bounds.x1,
            y1 = bounds.y1,
            x2 = bounds.x2,
            y2 = bounds.y2,
            size = bytes.len(),
            "Wrote tile"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_grid_shape_for_top_level_scenario() {
        let grid = TileGrid::new(10, 1000, 600, 256, 1);
        assert_eq!((grid.cols, grid.rows), (4, 3));
        assert_eq!(grid.tile_count(), 12);
    }

    #[test]
    fn test_corner_tile_bounds() {
        let grid = TileGrid::new(10, 1000, 600, 256, 1);
        assert_eq!(grid.bounds(0, 0), TileBounds::new(0, 0, 257, 257));
        assert_eq!(grid.bounds(1, 1), TileBounds::new(255, 255, 513, 513));
        assert_eq!(grid.bounds(3, 2), TileBounds::new(767, 511, 1000, 600));
    }

    #[test]
    fn test_interior_tiles_are_full_extent() {
        let grid = TileGrid::new(12, 2048, 2048, 256, 2);
        let bounds = grid.bounds(3, 4);
        assert_eq!(bounds.width(), 256 + 2 * 2);
        assert_eq!(bounds.height(), 256 + 2 * 2);
    }

    #[test]
    fn test_coords_cover_grid_exactly_once() {
        let grid = TileGrid::new(5, 700, 300, 128, 1);
        let coords: Vec<TileCoord> = grid.coords().collect();
        let unique: HashSet<TileCoord> = coords.iter().copied().collect();
        assert_eq!(coords.len() as u64, grid.tile_count());
        assert_eq!(unique.len(), coords.len());
        for col in 0..grid.cols {
            for row in 0..grid.rows {
                assert!(unique.contains(&TileCoord::new(5, col, row)));
            }
        }
    }

    #[test]
    fn test_zero_overlap_tiles_partition_level() {
        let grid = TileGrid::new(3, 300, 200, 128, 0);
        let area: u64 = grid
            .coords()
            .map(|t| {
                let b = grid.bounds(t.col, t.row);
                b.width() as u64 * b.height() as u64
            })
            .sum();
        assert_eq!(area, 300 * 200);
    }

    #[test]
    fn test_single_pixel_level() {
        let grid = TileGrid::new(0, 1, 1, 256, 1);
        assert_eq!((grid.cols, grid.rows), (1, 1));
        assert_eq!(grid.bounds(0, 0), TileBounds::new(0, 0, 1, 1));
    }
}
