//! Deep Zoom tile pyramid generation.
//!
//! Takes one arbitrarily large source raster and produces an
//! OpenSeadragon-compatible pyramid: a directory per level holding
//! overlapping tiles, plus a `.dzi` descriptor next to the tile root.
//!
//! # Architecture
//!
//! ```text
//! build_pyramid(source, output_root, config)
//!      │
//!      ├─► [prefer_fast_path] VipsPyramidBuilder ──(CapabilityUnavailable)──┐
//!      │                                                                    │
//!      └─► PyramidOrchestrator ◄────────────────────────────────────────────┘
//!               │
//!               ├─► PyramidPlan         level count and per-level sizes
//!               ├─► LevelRasterizer     resample the ORIGINAL source per level
//!               ├─► TileSlicer          crop + encode + write {level}/{col}_{row}.{ext}
//!               └─► DescriptorWriter    <root name>.dzi, written last
//! ```
//!
//! # Example
//!
//! ```ignore
//! use deepzoom::{build_pyramid, PyramidConfig, SourceRaster};
//!
//! let source = SourceRaster::open("output/plasma.png")?;
//! let report = build_pyramid(&source, "output/deepzoom_tiles".as_ref(), &PyramidConfig::default())?;
//! println!("descriptor at {}", report.descriptor_path.display());
//! ```

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod fastpath;
pub mod orchestrator;
pub mod planner;
pub mod png;
pub mod progress;
pub mod raster;
pub mod rasterizer;
pub mod slicer;
pub mod source;
pub mod storage;

// Re-export commonly used types at crate root
pub use builder::{build_pyramid, build_with_fallback, select_builder, PyramidBuilder};
pub use config::{DescriptorFormat, PyramidConfig, ResampleFilter};
pub use deepzoom_common::{
    PyramidError, PyramidResult, TileBounds, TileCoord, TileEncoding, TileGeometry,
};
pub use descriptor::{descriptor_path, DescriptorWriter, PyramidDescriptor};
pub use fastpath::VipsPyramidBuilder;
pub use orchestrator::{BuildReport, PyramidOrchestrator};
pub use planner::{level_dimensions, num_levels, LevelSpec, PyramidPlan};
pub use progress::{BuildEvent, ProgressReporter, RecordingProgress, TracingProgress};
pub use raster::{EncodeOptions, ImageRasterOps, RasterOps};
pub use rasterizer::LevelRasterizer;
pub use slicer::{TileGrid, TileSlicer};
pub use source::SourceRaster;
pub use storage::{FsStorage, TileStorage};
