//! The read-only full-resolution raster a pyramid is built from.

use std::path::{Path, PathBuf};

use deepzoom_common::{PyramidError, PyramidResult};
use image::{ColorType, DynamicImage};
use tracing::debug;

/// Full-resolution source image.
///
/// Never mutated during a build: every level is resampled from this raster.
/// The optional path records where the pixels came from so that external
/// tools (see [`crate::fastpath`]) can read the file directly.
#[derive(Debug, Clone)]
pub struct SourceRaster {
    image: DynamicImage,
    path: Option<PathBuf>,
}

impl SourceRaster {
    /// Decode a raster from disk.
    pub fn open(path: impl AsRef<Path>) -> PyramidResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            PyramidError::SourceUnreadable(format!("{}: {}", path.display(), e))
        })?;
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Opened source raster"
        );
        Ok(Self {
            image,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an in-memory image.
    pub fn from_image(image: impl Into<DynamicImage>) -> Self {
        Self {
            image: image.into(),
            path: None,
        }
    }

    /// Record the file the in-memory image was saved to.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn pixel_format(&self) -> ColorType {
        self.image.color()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
