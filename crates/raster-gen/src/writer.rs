//! Saving generated rasters to disk.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GeneratorError, GeneratorResult};

/// JPEG quality for saved source images.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Tiff,
    Jpeg,
}

impl OutputFormat {
    pub fn parse(s: &str) -> GeneratorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            _ => Err(GeneratorError::unknown("output format", s)),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// `generated_{w}x{h}_{YYYYmmdd_HHMMSS}`.
pub fn default_file_stem(width: u32, height: u32) -> String {
    format!(
        "generated_{}x{}_{}",
        width,
        height,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Save `img` as `<dir>/<stem>.<ext>`, creating `dir` if needed.
///
/// Without a stem a timestamped one is used.
pub fn save_image(
    img: &RgbImage,
    dir: &Path,
    stem: Option<&str>,
    format: OutputFormat,
) -> GeneratorResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| GeneratorError::write(dir, e))?;

    let stem = stem
        .map(str::to_string)
        .unwrap_or_else(|| default_file_stem(img.width(), img.height()));
    let path = dir.join(format!("{}.{}", stem, format.extension()));

    match format {
        OutputFormat::Png => img
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| GeneratorError::write(&path, e))?,
        OutputFormat::Tiff => img
            .save_with_format(&path, ImageFormat::Tiff)
            .map_err(|e| GeneratorError::write(&path, e))?,
        OutputFormat::Jpeg => {
            let file = File::create(&path).map_err(|e| GeneratorError::write(&path, e))?;
            let mut writer = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
                .encode_image(img)
                .map_err(|e| GeneratorError::write(&path, e))?;
        }
    }

    let size_mb = fs::metadata(&path)
        .map(|m| m.len() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0);
    info!(path = %path.display(), size_mb, "Image saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stem_shape() {
        let stem = default_file_stem(640, 480);
        assert!(stem.starts_with("generated_640x480_"));
        assert_eq!(stem.len(), "generated_640x480_".len() + 15);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("TIF").unwrap(), OutputFormat::Tiff);
        assert_eq!(OutputFormat::parse("jpeg").unwrap().extension(), "jpg");
        assert!(OutputFormat::parse("bmp").is_err());
    }
}
