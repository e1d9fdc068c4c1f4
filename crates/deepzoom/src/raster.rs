//! Raster-processing capability used by the pyramid builder.
//!
//! The builder never touches pixels directly: resampling, cropping and tile
//! encoding go through [`RasterOps`]. [`ImageRasterOps`] is the production
//! implementation on top of the `image` crate; tests substitute their own to
//! inject failures.

use std::sync::Arc;

use deepzoom_common::{TileBounds, TileEncoding};
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

use crate::config::PyramidConfig;
use crate::png::encode_png;

/// Per-tile encoder settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    pub encoding: TileEncoding,
    /// Used by [`TileEncoding::Jpeg`] only.
    pub jpeg_quality: u8,
    /// Used by [`TileEncoding::WebP`] only.
    pub webp_quality: f32,
}

impl EncodeOptions {
    pub fn from_config(config: &PyramidConfig) -> Self {
        Self {
            encoding: config.encoding(),
            jpeg_quality: config.jpeg_quality,
            webp_quality: config.webp_quality,
        }
    }
}

/// Resize, crop and encode operations consumed by the pyramid builder.
///
/// Implementations must be thread-safe (`Send + Sync`): tiles of one level
/// may be cropped and encoded concurrently.
pub trait RasterOps: Send + Sync {
    /// Resample `raster` to exactly `width` x `height`.
    fn resize(&self, raster: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, String>;

    /// Extract the half-open box `bounds` as an independent image.
    fn crop(&self, raster: &DynamicImage, bounds: TileBounds) -> Result<DynamicImage, String>;

    /// Encode a tile into the bytes of a complete image file.
    fn encode(&self, raster: &DynamicImage, options: &EncodeOptions) -> Result<Vec<u8>, String>;
}

impl<T: RasterOps + ?Sized> RasterOps for Arc<T> {
    fn resize(&self, raster: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, String> {
        (**self).resize(raster, width, height)
    }

    fn crop(&self, raster: &DynamicImage, bounds: TileBounds) -> Result<DynamicImage, String> {
        (**self).crop(raster, bounds)
    }

    fn encode(&self, raster: &DynamicImage, options: &EncodeOptions) -> Result<Vec<u8>, String> {
        (**self).encode(raster, options)
    }
}

/// [`RasterOps`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageRasterOps {
    filter: FilterType,
}

impl ImageRasterOps {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ImageRasterOps {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl RasterOps for ImageRasterOps {
    fn resize(&self, raster: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, String> {
        if width == 0 || height == 0 {
            return Err(format!("cannot resample to {}x{}", width, height));
        }
        if raster.width() == width && raster.height() == height {
            return Ok(raster.clone());
        }
        Ok(raster.resize_exact(width, height, self.filter))
    }

    fn crop(&self, raster: &DynamicImage, bounds: TileBounds) -> Result<DynamicImage, String> {
        if bounds.is_empty() || !bounds.fits_within(raster.width(), raster.height()) {
            return Err(format!(
                "crop box {:?} outside {}x{} raster",
                bounds,
                raster.width(),
                raster.height()
            ));
        }
        Ok(raster.crop_imm(bounds.x1, bounds.y1, bounds.width(), bounds.height()))
    }

    fn encode(&self, raster: &DynamicImage, options: &EncodeOptions) -> Result<Vec<u8>, String> {
        match options.encoding {
            TileEncoding::Jpeg => encode_jpeg(raster, options.jpeg_quality),
            TileEncoding::Png => encode_png(&raster.to_rgba8()),
            TileEncoding::WebP => encode_webp(raster, options.webp_quality),
        }
    }
}

/// Encode as JPEG at a fixed quality.
///
/// JPEG has no alpha channel, so translucent pixels are composited onto a
/// white background first.
pub fn encode_jpeg(raster: &DynamicImage, quality: u8) -> Result<Vec<u8>, String> {
    let rgb = if raster.color().has_alpha() {
        flatten_onto_white(raster)
    } else {
        raster.to_rgb8()
    };
    let (width, height) = rgb.dimensions();

    let mut jpeg_data = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_data, quality.min(100));
    encoder
        .encode(rgb.as_raw(), width, height, image::ColorType::Rgb8)
        .map_err(|e| format!("Failed to encode JPEG: {}", e))?;

    Ok(jpeg_data)
}

/// Encode as lossy WebP. Alpha is preserved.
pub fn encode_webp(raster: &DynamicImage, quality: f32) -> Result<Vec<u8>, String> {
    let rgba = raster.to_rgba8();
    let (width, height) = rgba.dimensions();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
    let encoded = encoder
        .encode_simple(false, quality.clamp(0.0, 100.0))
        .map_err(|e| format!("Failed to encode WebP {}x{}: {:?}", width, height, e))?;
    Ok(encoded.to_vec())
}

fn flatten_onto_white(raster: &DynamicImage) -> RgbImage {
    let rgba = raster.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
        }))
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let ops = ImageRasterOps::default();
        let resized = ops.resize(&gradient(1000, 600), 63, 38).unwrap();
        assert_eq!((resized.width(), resized.height()), (63, 38));
    }

    #[test]
    fn test_resize_to_zero_fails() {
        let ops = ImageRasterOps::default();
        assert!(ops.resize(&gradient(10, 10), 0, 5).is_err());
    }

    #[test]
    fn test_crop_edge_tile() {
        let ops = ImageRasterOps::default();
        let level = gradient(1000, 600);
        let tile = ops.crop(&level, TileBounds::new(767, 511, 1000, 600)).unwrap();
        assert_eq!((tile.width(), tile.height()), (233, 89));
    }

    #[test]
    fn test_crop_outside_raster_fails() {
        let ops = ImageRasterOps::default();
        let level = gradient(100, 100);
        assert!(ops.crop(&level, TileBounds::new(90, 90, 101, 100)).is_err());
    }

    #[test]
    fn test_encode_each_format() {
        let ops = ImageRasterOps::default();
        let tile = gradient(32, 32);

        let jpeg = ops
            .encode(
                &tile,
                &EncodeOptions {
                    encoding: TileEncoding::Jpeg,
                    jpeg_quality: 90,
                    webp_quality: 85.0,
                },
            )
            .unwrap();
        assert_eq!(&jpeg[0..3], &[0xFF, 0xD8, 0xFF]);

        let png = ops
            .encode(
                &tile,
                &EncodeOptions {
                    encoding: TileEncoding::Png,
                    jpeg_quality: 90,
                    webp_quality: 85.0,
                },
            )
            .unwrap();
        assert_eq!(&png[0..8], &crate::png::PNG_SIGNATURE);

        let webp = ops
            .encode(
                &tile,
                &EncodeOptions {
                    encoding: TileEncoding::WebP,
                    jpeg_quality: 90,
                    webp_quality: 85.0,
                },
            )
            .unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_webp_over_dimension_limit_is_an_error() {
        let wide = DynamicImage::ImageRgb8(RgbImage::new(16384, 1));
        let err = encode_webp(&wide, 85.0).unwrap_err();
        assert!(err.contains("16384x1"));
    }

    #[test]
    fn test_jpeg_flattens_alpha_onto_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let jpeg = encode_jpeg(&transparent, 95).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c > 245)));
    }
}
