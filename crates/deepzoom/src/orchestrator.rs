//! Drives a manual pyramid build end to end.
//!
//! ```text
//! build(source, output_root)
//!      │
//!      ├─► ensure output root is writable      (OutputUnavailable)
//!      ├─► PyramidPlan::new(width, height)     (InvalidDimensions)
//!      │
//!      ├─► for level in 0..num_levels          coarse → fine
//!      │       ├─► LevelRasterizer::rasterize  (Resample)
//!      │       ├─► TileSlicer::slice           (Encode / TileWrite)
//!      │       └─► report LevelComplete
//!      │
//!      ├─► DescriptorWriter::write             (DescriptorWrite)
//!      └─► report Finished
//! ```
//!
//! A failure at any step aborts the build. Tiles already written stay on
//! storage; no descriptor is written, which marks the pyramid incomplete.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deepzoom_common::{PyramidError, PyramidResult};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::PyramidConfig;
use crate::descriptor::{descriptor_path, DescriptorWriter, PyramidDescriptor};
use crate::planner::{validate_dimensions, PyramidPlan};
use crate::progress::{BuildEvent, ProgressReporter, TracingProgress};
use crate::raster::{EncodeOptions, ImageRasterOps, RasterOps};
use crate::rasterizer::LevelRasterizer;
use crate::slicer::{TileGrid, TileSlicer};
use crate::source::SourceRaster;
use crate::storage::{ensure_writable_dir, FsStorage, TileStorage};

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Name of the builder that produced the pyramid.
    pub builder: String,
    pub output_root: PathBuf,
    pub descriptor_path: PathBuf,
    /// Number of levels written, when known.
    pub levels: Option<u32>,
    /// Number of tiles written, when known.
    pub tiles: Option<u64>,
}

/// Builds a pyramid level by level with the configured collaborators.
pub struct PyramidOrchestrator {
    config: PyramidConfig,
    ops: Arc<dyn RasterOps>,
    storage: Arc<dyn TileStorage>,
    progress: Arc<dyn ProgressReporter>,
}

impl PyramidOrchestrator {
    /// Orchestrator using the `image` crate, the local filesystem and
    /// `tracing` progress logs.
    pub fn new(config: PyramidConfig) -> Self {
        let ops = ImageRasterOps::new(config.resample_filter.filter_type());
        Self {
            config,
            ops: Arc::new(ops),
            storage: Arc::new(FsStorage),
            progress: Arc::new(TracingProgress),
        }
    }

    pub fn with_raster_ops(mut self, ops: Arc<dyn RasterOps>) -> Self {
        self.ops = ops;
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn TileStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    /// Build the full pyramid of `source` under `output_root`.
    #[instrument(skip(self, source), fields(root = %output_root.display(), width = source.width(), height = source.height()))]
    pub fn build(&self, source: &SourceRaster, output_root: &Path) -> PyramidResult<BuildReport> {
        self.config.validate()?;
        validate_dimensions(source.width(), source.height())?;

        if descriptor_path(output_root, self.config.descriptor_format).is_none() {
            return Err(PyramidError::output_unavailable(
                output_root,
                "output root has no directory name to derive the descriptor from",
            ));
        }
        ensure_writable_dir(self.storage.as_ref(), output_root)
            .map_err(|e| PyramidError::output_unavailable(output_root, e))?;

        let plan = PyramidPlan::new(source.width(), source.height())?;
        self.progress.report(&BuildEvent::Started {
            source_width: plan.source_width,
            source_height: plan.source_height,
            num_levels: plan.num_levels(),
        });

        let geometry = self.config.geometry;
        let rasterizer = LevelRasterizer::new(source, self.ops.as_ref());
        let slicer = TileSlicer::new(
            self.ops.as_ref(),
            self.storage.as_ref(),
            EncodeOptions::from_config(&self.config),
            self.config.parallel_tiles,
        );

        let mut tiles = 0u64;
        for spec in plan.iter() {
            // One level raster alive at a time; dropped at the end of the iteration.
            let raster = rasterizer.rasterize(spec)?;
            let grid = TileGrid::from_geometry(spec.level, spec.width, spec.height, &geometry);
            tiles += slicer.slice(&raster, &grid, output_root)?;

            self.progress.report(&BuildEvent::LevelComplete {
                level: spec.level,
                width: spec.width,
                height: spec.height,
                cols: grid.cols,
                rows: grid.rows,
            });
        }

        let descriptor = PyramidDescriptor::new(&geometry, source.width(), source.height());
        let descriptor_path = DescriptorWriter::new(self.storage.as_ref(), self.config.descriptor_format)
            .write(&descriptor, output_root)?;
        self.progress.report(&BuildEvent::DescriptorWritten {
            path: descriptor_path.clone(),
        });

        self.progress.report(&BuildEvent::Finished {
            levels: plan.num_levels(),
            tiles,
        });
        info!(levels = plan.num_levels(), tiles, "Pyramid build complete");

        Ok(BuildReport {
            builder: "manual".to_string(),
            output_root: output_root.to_path_buf(),
            descriptor_path,
            levels: Some(plan.num_levels()),
            tiles: Some(tiles),
        })
    }
}
