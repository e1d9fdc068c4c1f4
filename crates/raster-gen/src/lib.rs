//! Procedural generation of very large RGB rasters.
//!
//! Used to produce source images for Deep Zoom pyramids. Every generator is
//! deterministic for a fixed [`GeneratorParams::seed`].
//!
//! ```ignore
//! use raster_gen::{generate, GeneratorKind, GeneratorParams};
//!
//! let img = generate(GeneratorKind::Plasma, 4000, 4000, &GeneratorParams::default())?;
//! ```

pub mod error;
pub mod fractal;
pub mod geometric;
pub mod gradient;
pub mod noise;
pub mod palette;
pub mod params;
pub mod plasma;
pub mod presets;
mod render;
pub mod voronoi;
pub mod writer;

use image::RgbImage;
use tracing::info;

pub use error::{GeneratorError, GeneratorResult};
pub use palette::Palette;
pub use params::{GeneratorKind, GeneratorParams, GradientDirection, ShapeKind};
pub use presets::{SizePreset, DEFAULT_SIZE};
pub use writer::{save_image, OutputFormat};

/// Render a `width` x `height` raster of the given kind.
pub fn generate(
    kind: GeneratorKind,
    width: u32,
    height: u32,
    params: &GeneratorParams,
) -> GeneratorResult<RgbImage> {
    if width == 0 || height == 0 {
        return Err(GeneratorError::InvalidDimensions { width, height });
    }

    info!(kind = %kind, width, height, seed = ?params.seed, "Generating raster");
    let img = match kind {
        GeneratorKind::Gradient => gradient::generate_gradient(width, height, params),
        GeneratorKind::Noise => noise::generate_noise(width, height, params),
        GeneratorKind::Geometric => geometric::generate_geometric(width, height, params),
        GeneratorKind::Voronoi => voronoi::generate_voronoi(width, height, params),
        GeneratorKind::Mandelbrot => fractal::generate_mandelbrot(width, height, params),
        GeneratorKind::Plasma => plasma::generate_plasma(width, height),
    };
    Ok(img)
}
