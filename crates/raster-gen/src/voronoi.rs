//! Voronoi cells coloured per seed point.

use image::{Rgb, RgbImage};
use rand::Rng;

use crate::params::GeneratorParams;
use crate::render::render_rows;

pub fn generate_voronoi(width: u32, height: u32, params: &GeneratorParams) -> RgbImage {
    let mut rng = params.rng();
    let sites: Vec<(i64, i64, Rgb<u8>)> = (0..params.num_points.max(1))
        .map(|_| {
            let x = rng.gen_range(0..=width) as i64;
            let y = rng.gen_range(0..=height) as i64;
            (x, y, params.pick_color(&mut rng))
        })
        .collect();

    render_rows(width, height, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let mut best = i64::MAX;
        let mut color = [0, 0, 0];
        for (sx, sy, site_color) in &sites {
            let dist = (x - sx) * (x - sx) + (y - sy) * (y - sy);
            if dist < best {
                best = dist;
                color = site_color.0;
            }
        }
        color
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_site_fills_image() {
        let params = GeneratorParams {
            num_points: 1,
            ..GeneratorParams::default().with_seed(9)
        };
        let img = generate_voronoi(20, 10, &params);
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().all(|p| *p == first));
    }
}
