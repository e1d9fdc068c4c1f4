//! Deterministic test rasters.
//!
//! Pixel values depend only on coordinates, so a test can predict the
//! content of any tile crop.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// RGB raster where pixel `(x, y)` is `(x % 256, y % 256, (x + y) % 256)`.
///
/// # Example
///
/// ```
/// use test_utils::create_test_raster;
///
/// let img = create_test_raster(300, 10);
/// assert_eq!(img.get_pixel(257, 3).0, [1, 3, 4]);
/// ```
pub fn create_test_raster(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// RGBA raster with the [`create_test_raster`] colours and alpha rising
/// left to right from 0 to 255.
pub fn create_test_raster_rgba(width: u32, height: u32) -> RgbaImage {
    let span = width.saturating_sub(1).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let alpha = (x as u64 * 255 / span as u64) as u8;
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, alpha])
    })
}

/// Single-colour raster.
pub fn create_flat_raster(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Four-colour checkerboard with `cell`-pixel squares.
pub fn create_checkerboard(width: u32, height: u32, cell: u32) -> RgbImage {
    const COLORS: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]];
    let cell = cell.max(1);
    RgbImage::from_fn(width, height, |x, y| {
        let idx = ((x / cell) + 2 * (y / cell)) % 4;
        Rgb(COLORS[idx as usize])
    })
}
