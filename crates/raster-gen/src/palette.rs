//! Named colour palettes and colour helpers.

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, GeneratorResult};

/// Named five-stop colour palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Vibrant,
    Pastel,
    Monochrome,
    Sunset,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Vibrant,
        Palette::Pastel,
        Palette::Monochrome,
        Palette::Sunset,
    ];

    pub fn parse(s: &str) -> GeneratorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "vibrant" => Ok(Palette::Vibrant),
            "pastel" => Ok(Palette::Pastel),
            "monochrome" => Ok(Palette::Monochrome),
            "sunset" => Ok(Palette::Sunset),
            _ => Err(GeneratorError::unknown("palette", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Vibrant => "vibrant",
            Palette::Pastel => "pastel",
            Palette::Monochrome => "monochrome",
            Palette::Sunset => "sunset",
        }
    }

    pub fn colors(&self) -> [Rgb<u8>; 5] {
        match self {
            Palette::Vibrant => [
                Rgb([255, 0, 0]),
                Rgb([255, 255, 0]),
                Rgb([0, 255, 0]),
                Rgb([0, 255, 255]),
                Rgb([0, 0, 255]),
            ],
            Palette::Pastel => [
                Rgb([255, 179, 186]),
                Rgb([255, 223, 186]),
                Rgb([255, 255, 186]),
                Rgb([186, 255, 201]),
                Rgb([186, 225, 255]),
            ],
            Palette::Monochrome => [
                Rgb([0, 0, 0]),
                Rgb([64, 64, 64]),
                Rgb([128, 128, 128]),
                Rgb([192, 192, 192]),
                Rgb([255, 255, 255]),
            ],
            Palette::Sunset => [
                Rgb([255, 94, 77]),
                Rgb([255, 145, 77]),
                Rgb([255, 195, 77]),
                Rgb([255, 224, 130]),
                Rgb([251, 236, 176]),
            ],
        }
    }

    /// Colour at position `t` in [0, 1] along the palette stops.
    pub fn sample(&self, t: f32) -> Rgb<u8> {
        let stops = self.colors();
        let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        interpolate_color(stops[idx], stops[idx + 1], scaled - idx as f32)
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Linear colour interpolation, truncating each channel.
pub fn interpolate_color(color1: Rgb<u8>, color2: Rgb<u8>, t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t) as u8;

    Rgb([
        mix(color1[0], color2[0]),
        mix(color1[1], color2[1]),
        mix(color1[2], color2[2]),
    ])
}

/// HSV to RGB with full saturation semantics of the usual hexcone model.
///
/// `h`, `s` and `v` are in [0, 1]; `h` wraps.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    if s <= 0.0 {
        let g = to_byte(v);
        return [g, g, g];
    }

    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_byte(r), to_byte(g), to_byte(b)]
}
