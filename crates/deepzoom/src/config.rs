//! Configuration for pyramid builds.

use deepzoom_common::{PyramidError, PyramidResult, TileEncoding, TileGeometry};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Default JPEG tile quality (0-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default WebP tile quality (0-100).
pub const DEFAULT_WEBP_QUALITY: f32 = 85.0;

/// Configuration for a pyramid build.
///
/// Passed explicitly into every entry point; nothing is read from ambient
/// state once a build has started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    /// Tile size, overlap and encoding.
    pub geometry: TileGeometry,

    /// Quality for JPEG tiles (1-100).
    pub jpeg_quality: u8,

    /// Quality for WebP tiles (0-100).
    pub webp_quality: f32,

    /// Filter used to derive every level from the source raster.
    pub resample_filter: ResampleFilter,

    /// Document format of the sidecar descriptor.
    pub descriptor_format: DescriptorFormat,

    /// Encode and write the tiles of one level in parallel.
    pub parallel_tiles: bool,

    /// Try the external fast path before building manually.
    pub prefer_fast_path: bool,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            geometry: TileGeometry::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            webp_quality: DEFAULT_WEBP_QUALITY,
            resample_filter: ResampleFilter::default(),
            descriptor_format: DescriptorFormat::default(),
            parallel_tiles: true,
            prefer_fast_path: false,
        }
    }
}

impl PyramidConfig {
    /// Load configuration from environment variables, starting from defaults.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DZ_TILE_SIZE") {
            if let Ok(size) = val.parse() {
                config.geometry.tile_size = size;
            }
        }

        if let Ok(val) = std::env::var("DZ_OVERLAP") {
            if let Ok(overlap) = val.parse() {
                config.geometry.overlap = overlap;
            }
        }

        if let Ok(val) = std::env::var("DZ_FORMAT") {
            if let Some(encoding) = TileEncoding::parse(&val) {
                config.geometry.encoding = encoding;
            }
        }

        if let Ok(val) = std::env::var("DZ_JPEG_QUALITY") {
            if let Ok(quality) = val.parse::<u8>() {
                config.jpeg_quality = quality.min(100);
            }
        }

        if let Ok(val) = std::env::var("DZ_WEBP_QUALITY") {
            if let Ok(quality) = val.parse::<f32>() {
                config.webp_quality = quality.clamp(0.0, 100.0);
            }
        }

        if let Ok(val) = std::env::var("DZ_RESAMPLE_FILTER") {
            config.resample_filter = ResampleFilter::from_str(&val);
        }

        if let Ok(val) = std::env::var("DZ_DESCRIPTOR_FORMAT") {
            config.descriptor_format = DescriptorFormat::from_str(&val);
        }

        if let Ok(val) = std::env::var("DZ_PARALLEL_TILES") {
            config.parallel_tiles = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("DZ_FAST_PATH") {
            config.prefer_fast_path = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Builder-style override of the tile geometry.
    pub fn with_geometry(mut self, tile_size: u32, overlap: u32, encoding: TileEncoding) -> Self {
        self.geometry = TileGeometry::new(tile_size, overlap, encoding);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> PyramidResult<()> {
        self.geometry.validate()?;

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(PyramidError::InvalidConfig(
                "jpeg_quality must be 1-100".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.webp_quality) {
            return Err(PyramidError::InvalidConfig(
                "webp_quality must be 0-100".to_string(),
            ));
        }

        Ok(())
    }

    pub fn encoding(&self) -> TileEncoding {
        self.geometry.encoding
    }
}

/// Resampling filter applied when deriving a level from the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Lanczos with window 3. Highest quality, slowest.
    #[default]
    Lanczos3,
    /// Cubic (Catmull-Rom).
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Linear (triangle).
    Triangle,
    /// Nearest neighbour.
    Nearest,
}

impl ResampleFilter {
    /// Parse from string (case-insensitive). Unknown names fall back to Lanczos3.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "lanczos" | "lanczos3" => Self::Lanczos3,
            "catmull-rom" | "catmullrom" | "cubic" => Self::CatmullRom,
            "gaussian" => Self::Gaussian,
            "triangle" | "bilinear" | "linear" => Self::Triangle,
            "nearest" => Self::Nearest,
            _ => Self::Lanczos3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lanczos3 => "lanczos3",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Triangle => "triangle",
            Self::Nearest => "nearest",
        }
    }

    /// The `image` crate filter implementing this choice.
    pub fn filter_type(&self) -> FilterType {
        match self {
            Self::Lanczos3 => FilterType::Lanczos3,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Triangle => FilterType::Triangle,
            Self::Nearest => FilterType::Nearest,
        }
    }
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document format of the pyramid descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    /// Deep Zoom XML (`.dzi`).
    #[default]
    Xml,
    /// OpenSeadragon JSON (`.json`).
    Json,
}

impl DescriptorFormat {
    /// Parse from string (case-insensitive). Unknown names fall back to XML.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Xml,
        }
    }

    /// Extension of the descriptor file.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "dzi",
            Self::Json => "json",
        }
    }
}
