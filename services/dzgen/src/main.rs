//! dzgen: procedural raster generator and Deep Zoom tiler.
//!
//! ```text
//! dzgen generate --type voronoi --preset small --deepzoom
//! dzgen tile output/plasma.png output/deepzoom_tiles --tile-format png
//! dzgen plan 16000 16000
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use deepzoom_common::PyramidError;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use commands::{GenerateArgs, PlanArgs, TileArgs};
use config::DzgenConfig;

#[derive(Parser, Debug)]
#[command(name = "dzgen")]
#[command(about = "Generate high-resolution rasters and Deep Zoom tile pyramids")]
struct Args {
    /// YAML configuration file (default: DZ_* environment variables)
    #[arg(short, long, env = "DZGEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a procedural image, optionally tiling it afterwards
    Generate(GenerateArgs),
    /// Build a Deep Zoom pyramid from an existing image
    Tile(TileArgs),
    /// Print the level and tile layout for a source size
    Plan(PlanArgs),
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let config = DzgenConfig::load(args.config.as_deref())?;
    info!(
        tile_size = config.pyramid.geometry.tile_size,
        overlap = config.pyramid.geometry.overlap,
        format = %config.pyramid.encoding(),
        "Loaded configuration"
    );

    let result = match args.command {
        Command::Generate(cmd) => commands::run_generate(&cmd, &config),
        Command::Tile(cmd) => commands::run_tile(&cmd, &config),
        Command::Plan(cmd) => commands::run_plan(&cmd, &config),
    };

    if let Err(err) = &result {
        error!(kind = error_kind(err), error = %format!("{:#}", err), "dzgen failed");
    }
    result
}

/// Structured `kind` field for a failed command.
fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<PyramidError>()
        .map(PyramidError::kind)
        .unwrap_or("other")
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_kind_sees_through_context() {
        let err = Err::<(), _>(PyramidError::InvalidDimensions {
            width: 0,
            height: 5,
        })
        .context("Failed to build pyramid at out/tiles")
        .unwrap_err();
        assert_eq!(error_kind(&err), "invalid_dimensions");
    }

    #[test]
    fn test_error_kind_for_other_errors() {
        let err = anyhow::anyhow!("unknown generator type");
        assert_eq!(error_kind(&err), "other");
    }
}
