//! Mandelbrot set over the window [-2.5, 1.5] x [-2, 2].

use image::RgbImage;

use crate::palette::hsv_to_rgb;
use crate::params::GeneratorParams;
use crate::render::render_rows;

const X_MIN: f64 = -2.5;
const X_MAX: f64 = 1.5;
const Y_MIN: f64 = -2.0;
const Y_MAX: f64 = 2.0;

pub fn generate_mandelbrot(width: u32, height: u32, params: &GeneratorParams) -> RgbImage {
    let max_iter = params.max_iterations.max(1);
    render_rows(width, height, |px, py| {
        let x0 = X_MIN + (X_MAX - X_MIN) * px as f64 / width as f64;
        let y0 = Y_MIN + (Y_MAX - Y_MIN) * py as f64 / height as f64;
        let iterations = escape_time(x0, y0, max_iter);
        if iterations == max_iter {
            [0, 0, 0]
        } else {
            hsv_to_rgb(iterations as f32 / max_iter as f32, 1.0, 1.0)
        }
    })
}

/// Iterations until `|z| > 2`, capped at `max_iter`.
pub fn escape_time(x0: f64, y0: f64, max_iter: u32) -> u32 {
    let (mut x, mut y) = (0.0f64, 0.0f64);
    let mut iteration = 0;
    while x * x + y * y <= 4.0 && iteration < max_iter {
        let xtemp = x * x - y * y + x0;
        y = 2.0 * x * y + y0;
        x = xtemp;
        iteration += 1;
    }
    iteration
}
