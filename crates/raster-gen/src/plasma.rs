//! Sum-of-sines plasma mapped onto the hue wheel.

use image::RgbImage;

use crate::palette::hsv_to_rgb;
use crate::render::render_rows;

const PERIOD: f32 = 50.0;

pub fn generate_plasma(width: u32, height: u32) -> RgbImage {
    render_rows(width, height, |x, y| hsv_to_rgb(plasma_value(x, y), 1.0, 1.0))
}

/// Plasma intensity in [0, 1].
pub fn plasma_value(x: u32, y: u32) -> f32 {
    let (x, y) = (x as f32, y as f32);
    let value = (x / PERIOD).sin()
        + (y / PERIOD).sin()
        + ((x + y) / PERIOD).sin()
        + ((x * x + y * y).sqrt() / PERIOD).sin();
    (value + 4.0) / 8.0
}
