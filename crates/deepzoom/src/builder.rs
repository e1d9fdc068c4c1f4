//! Builder selection: external fast path or manual orchestration.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              PyramidBuilder trait            │
//! │     build(&SourceRaster, &Path) -> Report    │
//! └──────────────────────────────────────────────┘
//!                       │
//!         ┌─────────────┴──────────────┐
//!         ▼                            ▼
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  VipsPyramidBuilder  │   │ PyramidOrchestrator  │
//! │  (vips dzsave)       │   │ (manual, in-process) │
//! └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! The fast path is chosen by a capability probe, never by configuration
//! alone: a missing `vips` falls back to the manual builder.

use std::path::Path;

use deepzoom_common::PyramidResult;
use tracing::{info, warn};

use crate::config::PyramidConfig;
use crate::fastpath::VipsPyramidBuilder;
use crate::orchestrator::{BuildReport, PyramidOrchestrator};
use crate::source::SourceRaster;

/// A way of producing a complete pyramid from a source raster.
pub trait PyramidBuilder: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Build the pyramid of `source` under `output_root`.
    fn build(&self, source: &SourceRaster, output_root: &Path) -> PyramidResult<BuildReport>;
}

impl PyramidBuilder for PyramidOrchestrator {
    fn name(&self) -> &str {
        "manual"
    }

    fn build(&self, source: &SourceRaster, output_root: &Path) -> PyramidResult<BuildReport> {
        PyramidOrchestrator::build(self, source, output_root)
    }
}

/// Run `primary`; if it reports a missing capability, run `fallback` instead.
///
/// Any other error from `primary` is returned unchanged.
pub fn build_with_fallback(
    primary: &dyn PyramidBuilder,
    fallback: &dyn PyramidBuilder,
    source: &SourceRaster,
    output_root: &Path,
) -> PyramidResult<BuildReport> {
    match primary.build(source, output_root) {
        Err(err) if err.is_fallback_trigger() => {
            warn!(
                primary = primary.name(),
                fallback = fallback.name(),
                reason = %err,
                "Primary builder unavailable, falling back"
            );
            fallback.build(source, output_root)
        }
        result => result,
    }
}

/// Pick a builder for `config` by probing for the fast path.
pub fn select_builder(config: &PyramidConfig) -> Box<dyn PyramidBuilder> {
    if config.prefer_fast_path {
        let vips = VipsPyramidBuilder::new(config.clone());
        if vips.is_available() {
            info!("Using vips fast path");
            return Box::new(vips);
        }
        warn!("vips not available, using manual builder");
    }
    Box::new(PyramidOrchestrator::new(config.clone()))
}

/// Build a pyramid with default collaborators.
///
/// With `prefer_fast_path` the vips builder is tried first and the manual
/// builder is used when vips cannot run this build.
pub fn build_pyramid(
    source: &SourceRaster,
    output_root: &Path,
    config: &PyramidConfig,
) -> PyramidResult<BuildReport> {
    let manual = PyramidOrchestrator::new(config.clone());
    if config.prefer_fast_path {
        let vips = VipsPyramidBuilder::new(config.clone());
        build_with_fallback(&vips, &manual, source, output_root)
    } else {
        manual.build(source, output_root)
    }
}
