//! dzgen configuration.
//!
//! Resolution order: `.env` (loaded in `main`) and `DZ_*` environment
//! variables, or a YAML file when `--config` is given; command line flags
//! override either.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use deepzoom::{DescriptorFormat, PyramidConfig};
use deepzoom_common::TileEncoding;
use serde::{Deserialize, Serialize};

/// Default directory for generated images.
pub const OUTPUT_DIR: &str = "output";

/// Default tile root for pyramids built after `generate --deepzoom`.
pub const DEEPZOOM_DIR: &str = "output/deepzoom_tiles";

/// Top-level dzgen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DzgenConfig {
    /// Pyramid settings
    pub pyramid: PyramidConfig,

    /// Directory generated images are written to
    pub output_dir: PathBuf,

    /// Tile root used by `generate --deepzoom`
    pub deepzoom_dir: PathBuf,
}

impl Default for DzgenConfig {
    fn default() -> Self {
        Self {
            pyramid: PyramidConfig::default(),
            output_dir: PathBuf::from(OUTPUT_DIR),
            deepzoom_dir: PathBuf::from(DEEPZOOM_DIR),
        }
    }
}

impl DzgenConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            pyramid: PyramidConfig::from_env(),
            ..Self::default()
        }
    }

    /// Load from a YAML file. Missing keys take their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// YAML file when given, environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml(path),
            None => Ok(Self::from_env()),
        }
    }
}

/// Command line overrides for pyramid settings.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PyramidOverrides {
    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Overlap in pixels on each tile edge
    #[arg(long)]
    pub overlap: Option<u32>,

    /// Tile encoding (jpg, png, webp)
    #[arg(long)]
    pub tile_format: Option<String>,

    /// JPEG tile quality (1-100)
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Descriptor document format (xml, json)
    #[arg(long)]
    pub descriptor: Option<String>,

    /// Try `vips dzsave` before the built-in builder
    #[arg(long)]
    pub fast_path: bool,

    /// Write tiles of a level one at a time
    #[arg(long)]
    pub sequential: bool,
}

impl PyramidOverrides {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, mut config: PyramidConfig) -> Result<PyramidConfig> {
        if let Some(tile_size) = self.tile_size {
            config.geometry.tile_size = tile_size;
        }
        if let Some(overlap) = self.overlap {
            config.geometry.overlap = overlap;
        }
        if let Some(format) = &self.tile_format {
            config.geometry.encoding = format.parse::<TileEncoding>()?;
        }
        if let Some(quality) = self.jpeg_quality {
            config.jpeg_quality = quality;
        }
        if let Some(descriptor) = &self.descriptor {
            config.descriptor_format = match descriptor.to_lowercase().as_str() {
                "xml" | "dzi" => DescriptorFormat::Xml,
                "json" => DescriptorFormat::Json,
                other => anyhow::bail!("Unknown descriptor format '{}'", other),
            };
        }
        if self.fast_path {
            config.prefer_fast_path = true;
        }
        if self.sequential {
            config.parallel_tiles = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_partial_config() {
        let yaml = r#"
output_dir: /tmp/images
pyramid:
  geometry:
    tile_size: 512
    overlap: 0
    encoding: png
  jpeg_quality: 80
"#;
        let config = DzgenConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/images"));
        assert_eq!(config.deepzoom_dir, PathBuf::from(DEEPZOOM_DIR));
        assert_eq!(config.pyramid.geometry.tile_size, 512);
        assert_eq!(config.pyramid.geometry.encoding, TileEncoding::Png);
        assert_eq!(config.pyramid.jpeg_quality, 80);
        assert!(config.pyramid.parallel_tiles);
    }

    #[test]
    fn test_yaml_file_missing() {
        assert!(DzgenConfig::from_yaml("/nonexistent/dzgen.yaml").is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = PyramidOverrides {
            tile_size: Some(254),
            overlap: Some(2),
            tile_format: Some("webp".to_string()),
            descriptor: Some("json".to_string()),
            sequential: true,
            ..Default::default()
        };
        let config = overrides.apply(PyramidConfig::default()).unwrap();
        assert_eq!(config.geometry.tile_size, 254);
        assert_eq!(config.geometry.overlap, 2);
        assert_eq!(config.geometry.encoding, TileEncoding::WebP);
        assert_eq!(config.descriptor_format, DescriptorFormat::Json);
        assert!(!config.parallel_tiles);
        assert!(!config.prefer_fast_path);
    }

    #[test]
    fn test_overrides_reject_invalid() {
        let zero = PyramidOverrides {
            tile_size: Some(0),
            ..Default::default()
        };
        assert!(zero.apply(PyramidConfig::default()).is_err());

        let bad_format = PyramidOverrides {
            tile_format: Some("gif".to_string()),
            ..Default::default()
        };
        assert!(bad_format.apply(PyramidConfig::default()).is_err());
    }
}
