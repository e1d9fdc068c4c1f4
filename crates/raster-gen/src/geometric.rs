//! Random filled shapes on a random background.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::Rng;

use crate::params::{GeneratorParams, ShapeKind};

pub fn generate_geometric(width: u32, height: u32, params: &GeneratorParams) -> RgbImage {
    let mut rng = params.rng();
    let background = params.pick_color(&mut rng);
    let mut img = RgbImage::from_pixel(width, height, background);

    for _ in 0..params.num_shapes {
        let color = params.pick_color(&mut rng);
        match params.shape {
            ShapeKind::Circles => draw_circle(&mut img, &mut rng, color),
            ShapeKind::Rectangles => draw_rectangle(&mut img, &mut rng, color),
            ShapeKind::Polygons => draw_polygon(&mut img, &mut rng, color),
        }
    }
    img
}

fn draw_circle(img: &mut RgbImage, rng: &mut StdRng, color: Rgb<u8>) {
    let x = rng.gen_range(0..=img.width()) as i32;
    let y = rng.gen_range(0..=img.height()) as i32;
    let radius = rng.gen_range(50..=500);
    draw_filled_circle_mut(img, (x, y), radius, color);
}

fn draw_rectangle(img: &mut RgbImage, rng: &mut StdRng, color: Rgb<u8>) {
    let x = rng.gen_range(0..=img.width().saturating_sub(100)) as i32;
    let y = rng.gen_range(0..=img.height().saturating_sub(100)) as i32;
    let w = rng.gen_range(100..=1000);
    let h = rng.gen_range(100..=1000);
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), color);
}

fn draw_polygon(img: &mut RgbImage, rng: &mut StdRng, color: Rgb<u8>) {
    let count = rng.gen_range(3..=8);
    let (w, h) = (img.width(), img.height());
    let mut points: Vec<Point<i32>> = (0..count)
        .map(|_| Point::new(rng.gen_range(0..=w) as i32, rng.gen_range(0..=h) as i32))
        .collect();

    // The polygon must not repeat a vertex consecutively or close itself.
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() >= 3 {
        draw_polygon_mut(img, &points, color);
    }
}
