//! Two-colour linear gradients.

use image::{Rgb, RgbImage};

use crate::palette::interpolate_color;
use crate::params::{GeneratorParams, GradientDirection};
use crate::render::render_rows;

pub fn generate_gradient(width: u32, height: u32, params: &GeneratorParams) -> RgbImage {
    let (start, end) = match params.palette {
        Some(palette) => {
            let stops = palette.colors();
            (stops[0], stops[stops.len() - 1])
        }
        None => {
            let mut rng = params.rng();
            (params.pick_color(&mut rng), params.pick_color(&mut rng))
        }
    };

    let direction = params.direction;
    render_rows(width, height, |x, y| {
        let ratio = match direction {
            GradientDirection::Horizontal => x as f32 / width as f32,
            GradientDirection::Vertical => y as f32 / height as f32,
        };
        let Rgb(color) = interpolate_color(start, end, ratio);
        color
    })
}
