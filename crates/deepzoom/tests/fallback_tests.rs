//! Tests for builder selection and fallback between the vips fast path and
//! the manual builder.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use deepzoom::{
    build_pyramid, build_with_fallback, select_builder, BuildReport, DescriptorFormat,
    PyramidBuilder, PyramidConfig, PyramidError, PyramidResult, SourceRaster, VipsPyramidBuilder,
};
use test_utils::{create_test_raster, list_tiles, temp_output_root, write_test_png};

/// Builder returning a fixed error, counting its calls.
struct ErrorBuilder {
    make_error: fn() -> PyramidError,
    calls: AtomicUsize,
}

impl ErrorBuilder {
    fn new(make_error: fn() -> PyramidError) -> Self {
        Self {
            make_error,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PyramidBuilder for ErrorBuilder {
    fn name(&self) -> &str {
        "error"
    }

    fn build(&self, _source: &SourceRaster, _output_root: &Path) -> PyramidResult<BuildReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }
}

/// Builder that succeeds without touching storage.
#[derive(Default)]
struct StubBuilder {
    calls: AtomicUsize,
}

impl PyramidBuilder for StubBuilder {
    fn name(&self) -> &str {
        "stub"
    }

    fn build(&self, _source: &SourceRaster, output_root: &Path) -> PyramidResult<BuildReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BuildReport {
            builder: self.name().to_string(),
            output_root: output_root.to_path_buf(),
            descriptor_path: PathBuf::from("stub.dzi"),
            levels: None,
            tiles: None,
        })
    }
}

fn tiny_source() -> SourceRaster {
    SourceRaster::from_image(create_test_raster(4, 4))
}

#[test]
fn test_fallback_on_capability_unavailable() {
    let primary = ErrorBuilder::new(|| PyramidError::CapabilityUnavailable("no vips".into()));
    let fallback = StubBuilder::default();

    let report =
        build_with_fallback(&primary, &fallback, &tiny_source(), Path::new("out/tiles")).unwrap();

    assert_eq!(report.builder, "stub");
    assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_fallback_on_other_errors() {
    let primary = ErrorBuilder::new(|| PyramidError::ExternalTool("dzsave crashed".into()));
    let fallback = StubBuilder::default();

    let err = build_with_fallback(&primary, &fallback, &tiny_source(), Path::new("out/tiles"))
        .unwrap_err();

    assert!(matches!(err, PyramidError::ExternalTool(_)));
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_primary_success_skips_fallback() {
    let primary = StubBuilder::default();
    let fallback = ErrorBuilder::new(|| PyramidError::ExternalTool("unused".into()));

    build_with_fallback(&primary, &fallback, &tiny_source(), Path::new("out/tiles")).unwrap();
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_vips_falls_back_to_manual() {
    let (dir, root) = temp_output_root();
    let raster = create_test_raster(300, 200);
    let input = write_test_png(dir.path(), "source.png", &raster);
    let source = SourceRaster::open(&input).unwrap();

    let vips = VipsPyramidBuilder::new(PyramidConfig::default())
        .with_program("/nonexistent/bin/vips-for-tests");
    let manual = deepzoom::PyramidOrchestrator::new(PyramidConfig::default());

    let report = build_with_fallback(&vips, &manual, &source, &root).unwrap();

    assert_eq!(report.builder, "manual");
    assert!(dir.path().join("pyramid.dzi").exists());
    assert!(!list_tiles(&root).is_empty());
}

#[test]
fn test_build_pyramid_in_memory_source_uses_manual() {
    let (dir, root) = temp_output_root();
    let mut config = PyramidConfig::default();
    config.prefer_fast_path = true;

    // In-memory rasters cannot be handed to vips, so the manual builder runs.
    let report = build_pyramid(&tiny_source(), &root, &config).unwrap();

    assert_eq!(report.builder, "manual");
    assert_eq!(report.levels, Some(3));
    assert!(dir.path().join("pyramid.dzi").exists());
}

#[test]
fn test_build_pyramid_json_descriptor_skips_vips() {
    let (dir, root) = temp_output_root();
    let input = write_test_png(dir.path(), "source.png", &create_test_raster(20, 10));
    let source = SourceRaster::open(&input).unwrap();

    let mut config = PyramidConfig::default();
    config.prefer_fast_path = true;
    config.descriptor_format = DescriptorFormat::Json;

    let report = build_pyramid(&source, &root, &config).unwrap();
    assert_eq!(report.builder, "manual");
    assert!(dir.path().join("pyramid.json").exists());
}

#[test]
fn test_select_builder_without_fast_path() {
    let builder = select_builder(&PyramidConfig::default());
    assert_eq!(builder.name(), "manual");
}

#[test]
fn test_vips_dzsave_layout() {
    test_utils::require_vips!();

    let (dir, root) = temp_output_root();
    let input = write_test_png(dir.path(), "source.png", &create_test_raster(600, 400));
    let source = SourceRaster::open(&input).unwrap();

    let report = VipsPyramidBuilder::new(PyramidConfig::default())
        .build(&source, &root)
        .unwrap();

    assert_eq!(report.builder, "vips");
    // onetile depth stops at level 8 (150x100).
    assert_eq!(report.levels, Some(3));
    assert!(dir.path().join("pyramid.dzi").exists());
    let tiles = dir.path().join("pyramid_files");
    assert!(tiles.join("10").join("0_0.jpg").exists());
    assert!(tiles.join("8").join("0_0.jpg").exists());
    assert!(!tiles.join("7").exists());
}
