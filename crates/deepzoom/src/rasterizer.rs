//! Produces the raster for one pyramid level.
//!
//! Every level is resampled from the original full-resolution source, never
//! from a previously produced level. This repeats full-resolution work once
//! per level but keeps resampling error from compounding down the pyramid.

use deepzoom_common::{PyramidError, PyramidResult};
use image::DynamicImage;
use tracing::debug;

use crate::planner::LevelSpec;
use crate::raster::RasterOps;
use crate::source::SourceRaster;

/// Resamples the source raster to the dimensions of a level.
pub struct LevelRasterizer<'a> {
    source: &'a SourceRaster,
    ops: &'a dyn RasterOps,
}

impl<'a> LevelRasterizer<'a> {
    pub fn new(source: &'a SourceRaster, ops: &'a dyn RasterOps) -> Self {
        Self { source, ops }
    }

    /// Produce a raster of exactly `spec.width` x `spec.height`.
    pub fn rasterize(&self, spec: &LevelSpec) -> PyramidResult<DynamicImage> {
        debug!(
            level = spec.level,
            from_width = self.source.width(),
            from_height = self.source.height(),
            to_width = spec.width,
            to_height = spec.height,
            "Resampling level from source"
        );

        let raster = self
            .ops
            .resize(self.source.image(), spec.width, spec.height)
            .map_err(|message| PyramidError::Resample {
                level: spec.level,
                message,
            })?;

        if raster.width() != spec.width || raster.height() != spec.height {
            return Err(PyramidError::Resample {
                level: spec.level,
                message: format!(
                    "resampler produced {}x{}, expected {}x{}",
                    raster.width(),
                    raster.height(),
                    spec.width,
                    spec.height
                ),
            });
        }

        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{EncodeOptions, ImageRasterOps};
    use deepzoom_common::TileBounds;
    use image::RgbImage;
    use std::sync::Mutex;

    /// Records the size of every raster handed to `resize`.
    #[derive(Default)]
    struct RecordingOps {
        inputs: Mutex<Vec<(u32, u32)>>,
    }

    impl RasterOps for RecordingOps {
        fn resize(&self, raster: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, String> {
            self.inputs.lock().unwrap().push((raster.width(), raster.height()));
            ImageRasterOps::default().resize(raster, width, height)
        }

        fn crop(&self, raster: &DynamicImage, bounds: TileBounds) -> Result<DynamicImage, String> {
            ImageRasterOps::default().crop(raster, bounds)
        }

        fn encode(&self, raster: &DynamicImage, options: &EncodeOptions) -> Result<Vec<u8>, String> {
            ImageRasterOps::default().encode(raster, options)
        }
    }

    /// Returns a raster of the wrong size.
    struct ShortOps;

    impl RasterOps for ShortOps {
        fn resize(&self, _raster: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, String> {
            Ok(DynamicImage::new_rgb8(width.saturating_sub(1).max(1), height))
        }

        fn crop(&self, raster: &DynamicImage, _bounds: TileBounds) -> Result<DynamicImage, String> {
            Ok(raster.clone())
        }

        fn encode(&self, _raster: &DynamicImage, _options: &EncodeOptions) -> Result<Vec<u8>, String> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_every_level_resamples_the_original() {
        let source = SourceRaster::from_image(RgbImage::new(300, 200));
        let ops = RecordingOps::default();
        let rasterizer = LevelRasterizer::new(&source, &ops);

        for spec in [
            LevelSpec { level: 8, width: 150, height: 100 },
            LevelSpec { level: 7, width: 75, height: 50 },
            LevelSpec { level: 0, width: 1, height: 1 },
        ] {
            let raster = rasterizer.rasterize(&spec).unwrap();
            assert_eq!((raster.width(), raster.height()), (spec.width, spec.height));
        }

        let inputs = ops.inputs.lock().unwrap();
        assert_eq!(inputs.as_slice(), &[(300, 200), (300, 200), (300, 200)]);
    }

    #[test]
    fn test_wrong_output_size_is_resample_error() {
        let source = SourceRaster::from_image(RgbImage::new(16, 16));
        let rasterizer = LevelRasterizer::new(&source, &ShortOps);
        let err = rasterizer
            .rasterize(&LevelSpec { level: 2, width: 4, height: 4 })
            .unwrap_err();
        assert!(matches!(err, PyramidError::Resample { level: 2, .. }));
    }
}
