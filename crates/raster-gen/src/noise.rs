//! Multi-octave value noise.
//!
//! Each octave samples a lattice of random values per colour channel and
//! interpolates bilinearly between lattice points. Lattice values come from a
//! seeded hash of `(octave, ix, iy, channel)`, so no lattice is ever held in
//! memory and rows can be rendered independently.

use image::RgbImage;
use rand::Rng;

use crate::params::GeneratorParams;
use crate::render::render_rows;

pub fn generate_noise(width: u32, height: u32, params: &GeneratorParams) -> RgbImage {
    let seed: u64 = params.rng().gen();
    let octaves = params.noise_octaves.clamp(1, 16);
    let base_spacing = params.noise_scale.max(1) as f32;

    // Amplitudes 1, 1/2, 1/4, ...; normalised so the sum spans [0, 255].
    let total_amp: f32 = (0..octaves).map(|o| 0.5f32.powi(o as i32)).sum();

    render_rows(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        for octave in 0..octaves {
            let spacing = (base_spacing / (1u32 << octave) as f32).max(1.0);
            let amp = 0.5f32.powi(octave as i32);
            let gx = x as f32 / spacing;
            let gy = y as f32 / spacing;
            for (channel, value) in acc.iter_mut().enumerate() {
                *value += amp * sample(seed, octave, gx, gy, channel as u32);
            }
        }
        acc.map(|v| ((v / total_amp) * 255.0).clamp(0.0, 255.0) as u8)
    })
}

/// Bilinear interpolation of lattice values around `(gx, gy)`.
fn sample(seed: u64, octave: u32, gx: f32, gy: f32, channel: u32) -> f32 {
    let x0 = gx.floor();
    let y0 = gy.floor();
    let fx = gx - x0;
    let fy = gy - y0;
    let (ix, iy) = (x0 as u32, y0 as u32);

    let v00 = lattice(seed, octave, ix, iy, channel);
    let v10 = lattice(seed, octave, ix + 1, iy, channel);
    let v01 = lattice(seed, octave, ix, iy + 1, channel);
    let v11 = lattice(seed, octave, ix + 1, iy + 1, channel);

    let top = v00 + (v10 - v00) * fx;
    let bottom = v01 + (v11 - v01) * fx;
    top + (bottom - top) * fy
}

/// Deterministic value in [0, 1) for one lattice point (splitmix64 finaliser).
fn lattice(seed: u64, octave: u32, ix: u32, iy: u32, channel: u32) -> f32 {
    let mut z = seed
        ^ (octave as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ ((ix as u64) << 32 | iy as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9)
        ^ (channel as u64).wrapping_mul(0x94D0_49BB_1331_11EB);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 40) as f32 / (1u64 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_range_and_determinism() {
        for ix in 0..50 {
            let v = lattice(7, 0, ix, ix * 3, 1);
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, lattice(7, 0, ix, ix * 3, 1));
        }
    }

    #[test]
    fn test_sample_hits_lattice_points() {
        assert_eq!(sample(1, 2, 3.0, 4.0, 0), lattice(1, 2, 3, 4, 0));
    }

    #[test]
    fn test_noise_is_not_flat() {
        let img = generate_noise(64, 64, &GeneratorParams::default().with_seed(11));
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().any(|p| *p != first));
    }
}
