//! Tests for the public generator entry point and the image writer.

use raster_gen::{
    generate, save_image, GeneratorError, GeneratorKind, GeneratorParams, OutputFormat, Palette,
};

// ============================================================================
// generate() tests
// ============================================================================

#[test]
fn test_every_kind_has_requested_dimensions() {
    let params = GeneratorParams::default().with_seed(42);
    for kind in GeneratorKind::ALL {
        let img = generate(kind, 97, 53, &params).unwrap();
        assert_eq!(img.dimensions(), (97, 53), "{}", kind);
    }
}

#[test]
fn test_seeded_generation_is_deterministic() {
    let params = GeneratorParams::default().with_seed(1234);
    for kind in GeneratorKind::ALL {
        let a = generate(kind, 64, 48, &params).unwrap();
        let b = generate(kind, 64, 48, &params).unwrap();
        assert_eq!(a, b, "{}", kind);
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate(GeneratorKind::Voronoi, 64, 64, &GeneratorParams::default().with_seed(1))
        .unwrap();
    let b = generate(GeneratorKind::Voronoi, 64, 64, &GeneratorParams::default().with_seed(2))
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_palette_restricts_voronoi_colors() {
    let params = GeneratorParams {
        palette: Some(Palette::Sunset),
        num_points: 20,
        ..GeneratorParams::default().with_seed(8)
    };
    let img = generate(GeneratorKind::Voronoi, 50, 50, &params).unwrap();
    let stops = Palette::Sunset.colors();
    assert!(img.pixels().all(|p| stops.contains(p)));
}

#[test]
fn test_zero_dimension_rejected() {
    let err = generate(GeneratorKind::Plasma, 0, 10, &GeneratorParams::default()).unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::InvalidDimensions {
            width: 0,
            height: 10
        }
    ));
}

#[test]
fn test_kind_aliases() {
    assert_eq!(GeneratorKind::parse("perlin").unwrap(), GeneratorKind::Noise);
    assert_eq!(GeneratorKind::parse("fractal").unwrap(), GeneratorKind::Mandelbrot);
    assert!(GeneratorKind::parse("julia").is_err());
}

// ============================================================================
// save_image() tests
// ============================================================================

#[test]
fn test_save_each_format() {
    let dir = tempfile::tempdir().unwrap();
    let img = generate(GeneratorKind::Plasma, 40, 30, &GeneratorParams::default()).unwrap();

    for format in [OutputFormat::Png, OutputFormat::Tiff, OutputFormat::Jpeg] {
        let path = save_image(&img, dir.path(), Some("plasma"), format).unwrap();
        assert_eq!(path, dir.path().join(format!("plasma.{}", format.extension())));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }
}

#[test]
fn test_save_png_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let img = generate(GeneratorKind::Noise, 32, 32, &GeneratorParams::default().with_seed(4))
        .unwrap();
    let path = save_image(&img, dir.path(), Some("noise"), OutputFormat::Png).unwrap();
    assert_eq!(image::open(path).unwrap().to_rgb8(), img);
}

#[test]
fn test_save_creates_directory_and_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let img = generate(GeneratorKind::Gradient, 8, 8, &GeneratorParams::default()).unwrap();

    let path = save_image(&img, &out, None, OutputFormat::Png).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("generated_8x8_"));
    assert!(name.ends_with(".png"));
}
