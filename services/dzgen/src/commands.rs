//! Subcommand implementations.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use deepzoom::{build_pyramid, PyramidPlan, SourceRaster, TileGrid};
use raster_gen::{
    generate, save_image, GeneratorKind, GeneratorParams, GradientDirection, OutputFormat,
    Palette, ShapeKind, SizePreset, DEFAULT_SIZE,
};
use serde::Serialize;
use tracing::info;

use crate::config::{DzgenConfig, PyramidOverrides};

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Pattern: gradient, noise, geometric, voronoi, mandelbrot, plasma
    #[arg(short = 't', long = "type", default_value = "gradient")]
    pub kind: String,

    /// Size preset: small, medium, large, xlarge, xxlarge
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Image width (ignored with --preset)
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Image height (ignored with --preset)
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Output image format: png, tiff, jpg
    #[arg(short, long, default_value = "png")]
    pub format: String,

    /// Output file name without extension (default: timestamped)
    #[arg(short = 'o', long)]
    pub filename: Option<String>,

    /// Output directory (default from configuration)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// RNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Colour palette: vibrant, pastel, monochrome, sunset
    #[arg(long)]
    pub palette: Option<String>,

    /// Gradient direction: horizontal, vertical
    #[arg(long, default_value = "horizontal")]
    pub direction: String,

    /// Shape for geometric patterns: circles, rectangles, polygons
    #[arg(long, default_value = "circles")]
    pub shape: String,

    /// Number of shapes for geometric patterns
    #[arg(long, default_value = "100")]
    pub num_shapes: u32,

    /// Number of seed points for Voronoi
    #[arg(long, default_value = "100")]
    pub num_points: u32,

    /// Also build a Deep Zoom pyramid from the saved image
    #[arg(long)]
    pub deepzoom: bool,

    /// Tile root for --deepzoom (default from configuration)
    #[arg(long)]
    pub deepzoom_dir: Option<PathBuf>,

    #[command(flatten)]
    pub pyramid: PyramidOverrides,
}

impl GenerateArgs {
    fn dimensions(&self) -> Result<(u32, u32)> {
        if let Some(preset) = &self.preset {
            return Ok(SizePreset::parse(preset)?.dimensions());
        }
        Ok((
            self.width.unwrap_or(DEFAULT_SIZE),
            self.height.unwrap_or(DEFAULT_SIZE),
        ))
    }

    fn params(&self) -> Result<GeneratorParams> {
        Ok(GeneratorParams {
            seed: self.seed,
            palette: self.palette.as_deref().map(Palette::parse).transpose()?,
            direction: GradientDirection::parse(&self.direction)?,
            shape: ShapeKind::parse(&self.shape)?,
            num_shapes: self.num_shapes,
            num_points: self.num_points,
            ..GeneratorParams::default()
        })
    }
}

#[derive(clap::Args, Debug)]
pub struct TileArgs {
    /// Source image
    pub image: PathBuf,

    /// Tile root; the descriptor is written next to it
    pub output_root: PathBuf,

    #[command(flatten)]
    pub pyramid: PyramidOverrides,
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    pub width: u32,
    pub height: u32,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub pyramid: PyramidOverrides,
}

pub fn run_generate(args: &GenerateArgs, config: &DzgenConfig) -> Result<()> {
    let kind = GeneratorKind::parse(&args.kind)?;
    let (width, height) = args.dimensions()?;
    let params = args.params()?;
    let format = OutputFormat::parse(&args.format)?;
    // Validate tiling flags before spending time on generation.
    let pyramid_config = args.pyramid.apply(config.pyramid.clone())?;

    let started = Instant::now();
    let img = generate(kind, width, height, &params)?;
    info!(kind = %kind, elapsed_ms = started.elapsed().as_millis() as u64, "Generation complete");

    let output_dir = args.output_dir.as_ref().unwrap_or(&config.output_dir);
    let path = save_image(&img, output_dir, args.filename.as_deref(), format)?;
    println!("Image saved: {}", path.display());

    if args.deepzoom {
        let root = args.deepzoom_dir.as_ref().unwrap_or(&config.deepzoom_dir);
        // Hand over ownership of the pixels; the saved file backs the fast path.
        let source = SourceRaster::from_image(img).with_path(&path);
        tile_source(&source, root, &pyramid_config)?;
    }
    Ok(())
}

pub fn run_tile(args: &TileArgs, config: &DzgenConfig) -> Result<()> {
    let pyramid_config = args.pyramid.apply(config.pyramid.clone())?;
    let source = SourceRaster::open(&args.image)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;
    tile_source(&source, &args.output_root, &pyramid_config)
}

fn tile_source(
    source: &SourceRaster,
    output_root: &std::path::Path,
    config: &deepzoom::PyramidConfig,
) -> Result<()> {
    let started = Instant::now();
    let report = build_pyramid(source, output_root, config)
        .with_context(|| format!("Failed to build pyramid at {}", output_root.display()))?;

    info!(
        builder = %report.builder,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Deep Zoom tiles generated"
    );
    println!("Tiles: {}", report.output_root.display());
    println!("Descriptor: {}", report.descriptor_path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct LevelRow {
    level: u32,
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
    tiles: u64,
}

fn plan_rows(width: u32, height: u32, config: &deepzoom::PyramidConfig) -> Result<Vec<LevelRow>> {
    let plan = PyramidPlan::new(width, height)?;
    Ok(plan
        .iter()
        .map(|spec| {
            let grid = TileGrid::from_geometry(spec.level, spec.width, spec.height, &config.geometry);
            LevelRow {
                level: spec.level,
                width: spec.width,
                height: spec.height,
                cols: grid.cols,
                rows: grid.rows,
                tiles: grid.tile_count(),
            }
        })
        .collect())
}

pub fn run_plan(args: &PlanArgs, config: &DzgenConfig) -> Result<()> {
    let pyramid_config = args.pyramid.apply(config.pyramid.clone())?;
    let rows = plan_rows(args.width, args.height, &pyramid_config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:>5} {:>8} {:>8} {:>5} {:>5} {:>8}", "level", "width", "height", "cols", "rows", "tiles");
    for row in &rows {
        println!(
            "{:>5} {:>8} {:>8} {:>5} {:>5} {:>8}",
            row.level, row.width, row.height, row.cols, row.rows, row.tiles
        );
    }
    let total: u64 = rows.iter().map(|r| r.tiles).sum();
    println!("{} levels, {} tiles", rows.len(), total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_rows_landscape() {
        let rows = plan_rows(1000, 600, &deepzoom::PyramidConfig::default()).unwrap();
        assert_eq!(rows.len(), 11);
        let top = rows.last().unwrap();
        assert_eq!((top.width, top.height, top.cols, top.rows), (1000, 600, 4, 3));
        assert_eq!(rows.iter().map(|r| r.tiles).sum::<u64>(), 25);
    }

    #[test]
    fn test_plan_rejects_zero() {
        assert!(plan_rows(0, 600, &deepzoom::PyramidConfig::default()).is_err());
    }

    #[test]
    fn test_generate_and_tile() {
        let dir = tempfile::tempdir().unwrap();
        let config = DzgenConfig {
            output_dir: dir.path().join("images"),
            deepzoom_dir: dir.path().join("tiles"),
            ..DzgenConfig::default()
        };
        let args = GenerateArgs {
            kind: "plasma".to_string(),
            preset: None,
            width: Some(300),
            height: Some(200),
            format: "png".to_string(),
            filename: Some("plasma".to_string()),
            output_dir: None,
            seed: Some(1),
            palette: None,
            direction: "horizontal".to_string(),
            shape: "circles".to_string(),
            num_shapes: 10,
            num_points: 10,
            deepzoom: true,
            deepzoom_dir: None,
            pyramid: PyramidOverrides::default(),
        };

        run_generate(&args, &config).unwrap();

        assert!(dir.path().join("images").join("plasma.png").exists());
        assert!(dir.path().join("tiles.dzi").exists());
        assert!(dir.path().join("tiles").join("9").join("0_0.jpg").exists());
    }

    #[test]
    fn test_preset_overrides_size() {
        let args = GenerateArgs {
            kind: "gradient".to_string(),
            preset: Some("medium".to_string()),
            width: Some(10),
            height: Some(10),
            format: "png".to_string(),
            filename: None,
            output_dir: None,
            seed: None,
            palette: None,
            direction: "horizontal".to_string(),
            shape: "circles".to_string(),
            num_shapes: 100,
            num_points: 100,
            deepzoom: false,
            deepzoom_dir: None,
            pyramid: PyramidOverrides::default(),
        };
        assert_eq!(args.dimensions().unwrap(), (8000, 8000));
    }
}
