//! Fast path: delegate the whole build to libvips' `dzsave`.
//!
//! `vips dzsave` streams the source through libvips and is much faster than
//! the manual builder for very large rasters. It is optional: when the
//! `vips` executable is missing the builder reports
//! [`PyramidError::CapabilityUnavailable`] before touching storage, and the
//! caller falls back to [`crate::PyramidOrchestrator`].
//!
//! Layout differs slightly from the manual builder: vips places tiles under
//! `<root>_files/` next to `<root>.dzi`, and stops at the first level that
//! fits in one tile instead of continuing down to 1x1.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use deepzoom_common::{PyramidError, PyramidResult, TileEncoding};
use tracing::{debug, info, instrument};

use crate::builder::PyramidBuilder;
use crate::config::{DescriptorFormat, PyramidConfig};
use crate::descriptor::descriptor_path;
use crate::orchestrator::BuildReport;
use crate::planner::{level_dimensions, num_levels, validate_dimensions};
use crate::source::SourceRaster;

/// Default name of the libvips command line tool.
pub const VIPS_PROGRAM: &str = "vips";

/// Builder delegating to `vips dzsave`.
#[derive(Debug, Clone)]
pub struct VipsPyramidBuilder {
    config: PyramidConfig,
    program: PathBuf,
}

impl VipsPyramidBuilder {
    pub fn new(config: PyramidConfig) -> Self {
        Self {
            config,
            program: PathBuf::from(VIPS_PROGRAM),
        }
    }

    /// Use a specific `vips` executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Run `vips --version`. Returns the version line when the tool works.
    pub fn probe(&self) -> PyramidResult<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|e| {
                PyramidError::CapabilityUnavailable(format!(
                    "{} not runnable: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(PyramidError::CapabilityUnavailable(format!(
                "{} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(version = %version, "Found libvips");
        Ok(version)
    }

    pub fn is_available(&self) -> bool {
        self.probe().is_ok()
    }

    /// `--suffix` argument selecting tile format and quality.
    fn suffix(&self) -> String {
        match self.config.encoding() {
            TileEncoding::Jpeg => format!(".jpg[Q={}]", self.config.jpeg_quality),
            TileEncoding::Png => ".png".to_string(),
            TileEncoding::WebP => format!(".webp[Q={}]", self.config.webp_quality.round() as u32),
        }
    }

    fn dzsave_args(&self, input: &Path, output_root: &Path) -> Vec<OsString> {
        let geometry = self.config.geometry;
        vec![
            "dzsave".into(),
            input.into(),
            output_root.into(),
            "--suffix".into(),
            self.suffix().into(),
            "--tile-size".into(),
            geometry.tile_size.to_string().into(),
            "--overlap".into(),
            geometry.overlap.to_string().into(),
            "--depth".into(),
            "onetile".into(),
        ]
    }

    /// Every check that can be made without side effects.
    fn check_capability(&self, source: &SourceRaster) -> PyramidResult<PathBuf> {
        if self.config.descriptor_format != DescriptorFormat::Xml {
            return Err(PyramidError::CapabilityUnavailable(
                "vips dzsave only writes XML descriptors".to_string(),
            ));
        }
        let input = source.path().ok_or_else(|| {
            PyramidError::CapabilityUnavailable("source raster is not backed by a file".to_string())
        })?;
        self.probe()?;
        Ok(input.to_path_buf())
    }
}

impl PyramidBuilder for VipsPyramidBuilder {
    fn name(&self) -> &str {
        "vips"
    }

    #[instrument(skip(self, source), fields(root = %output_root.display()))]
    fn build(&self, source: &SourceRaster, output_root: &Path) -> PyramidResult<BuildReport> {
        validate_dimensions(source.width(), source.height())?;
        self.config.validate()?;
        let input = self.check_capability(source)?;

        let descriptor = descriptor_path(output_root, DescriptorFormat::Xml).ok_or_else(|| {
            PyramidError::output_unavailable(output_root, "output root has no directory name")
        })?;
        if let Some(parent) = descriptor.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| PyramidError::output_unavailable(parent, e))?;
        }

        info!(input = %input.display(), suffix = %self.suffix(), "Delegating pyramid build to vips dzsave");
        let output = Command::new(&self.program)
            .args(self.dzsave_args(&input, output_root))
            .output()
            .map_err(|e| PyramidError::ExternalTool(format!("failed to run vips: {}", e)))?;

        if !output.status.success() {
            return Err(PyramidError::ExternalTool(format!(
                "vips dzsave failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut tile_root = output_root.as_os_str().to_os_string();
        tile_root.push("_files");

        Ok(BuildReport {
            builder: self.name().to_string(),
            output_root: PathBuf::from(tile_root),
            descriptor_path: descriptor,
            levels: Some(onetile_level_count(
                source.width(),
                source.height(),
                self.config.geometry.tile_size,
            )),
            tiles: None,
        })
    }
}

/// Levels written by `dzsave --depth onetile`.
///
/// vips stops at the finest level that fits in a single tile, so the
/// coarser levels down to 1x1 are never produced.
fn onetile_level_count(width: u32, height: u32, tile_size: u32) -> u32 {
    let total = num_levels(width, height);
    let coarsest = (0..total)
        .rev()
        .find(|&level| {
            let (w, h) = level_dimensions(width, height, level, total);
            w.max(h) <= tile_size
        })
        .unwrap_or(0);
    total - coarsest
}
