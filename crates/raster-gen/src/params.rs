//! Generator kinds and their parameters.

use image::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, GeneratorResult};
use crate::palette::Palette;

/// Which procedural pattern to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Gradient,
    Noise,
    Geometric,
    Voronoi,
    Mandelbrot,
    Plasma,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 6] = [
        GeneratorKind::Gradient,
        GeneratorKind::Noise,
        GeneratorKind::Geometric,
        GeneratorKind::Voronoi,
        GeneratorKind::Mandelbrot,
        GeneratorKind::Plasma,
    ];

    /// Parse from string. `perlin` and `fractal` are accepted as aliases.
    pub fn parse(s: &str) -> GeneratorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "gradient" => Ok(GeneratorKind::Gradient),
            "noise" | "perlin" => Ok(GeneratorKind::Noise),
            "geometric" => Ok(GeneratorKind::Geometric),
            "voronoi" => Ok(GeneratorKind::Voronoi),
            "mandelbrot" | "fractal" => Ok(GeneratorKind::Mandelbrot),
            "plasma" => Ok(GeneratorKind::Plasma),
            _ => Err(GeneratorError::unknown("generator", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Gradient => "gradient",
            GeneratorKind::Noise => "noise",
            GeneratorKind::Geometric => "geometric",
            GeneratorKind::Voronoi => "voronoi",
            GeneratorKind::Mandelbrot => "mandelbrot",
            GeneratorKind::Plasma => "plasma",
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl GradientDirection {
    pub fn parse(s: &str) -> GeneratorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "horizontal" => Ok(GradientDirection::Horizontal),
            "vertical" => Ok(GradientDirection::Vertical),
            _ => Err(GeneratorError::unknown("gradient direction", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circles,
    Rectangles,
    Polygons,
}

impl ShapeKind {
    pub fn parse(s: &str) -> GeneratorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "circles" => Ok(ShapeKind::Circles),
            "rectangles" => Ok(ShapeKind::Rectangles),
            "polygons" => Ok(ShapeKind::Polygons),
            _ => Err(GeneratorError::unknown("shape", s)),
        }
    }
}

/// Knobs shared by all generators. Each generator reads the fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    /// RNG seed. `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Colours for shapes, cells and gradient ends. `None` means random colours.
    pub palette: Option<Palette>,

    pub direction: GradientDirection,

    /// Lattice spacing in pixels of the coarsest noise octave.
    pub noise_scale: u32,
    pub noise_octaves: u32,

    pub shape: ShapeKind,
    pub num_shapes: u32,

    /// Voronoi seed points.
    pub num_points: u32,

    pub max_iterations: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            seed: None,
            palette: None,
            direction: GradientDirection::default(),
            noise_scale: 100,
            noise_octaves: 6,
            shape: ShapeKind::default(),
            num_shapes: 100,
            num_points: 100,
            max_iterations: 256,
        }
    }
}

impl GeneratorParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Pick a colour: a random palette stop, or a uniformly random colour.
    pub(crate) fn pick_color(&self, rng: &mut StdRng) -> Rgb<u8> {
        match self.palette {
            Some(palette) => {
                let stops = palette.colors();
                stops[rng.gen_range(0..stops.len())]
            }
            None => Rgb(rng.gen()),
        }
    }
}
