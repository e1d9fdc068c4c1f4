//! Deep Zoom descriptor (`.dzi`) serialization.
//!
//! The descriptor is the sidecar document viewers read to navigate the tile
//! tree. It lives next to the tile root, not inside it:
//!
//! ```text
//! output/
//!   deepzoom_tiles/        <- tile root
//!     0/0_0.jpg
//!     ...
//!   deepzoom_tiles.dzi     <- descriptor
//! ```
//!
//! It is written exactly once, after every tile exists, so its presence is
//! the completion marker of a build.

use std::path::{Path, PathBuf};

use deepzoom_common::{PyramidError, PyramidResult, TileGeometry};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::DescriptorFormat;
use crate::storage::TileStorage;

/// XML namespace of the Deep Zoom schema.
pub const DZI_NAMESPACE: &str = "http://schemas.microsoft.com/deepzoom/2008";

/// Pyramid metadata consumed by Deep Zoom viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidDescriptor {
    /// Tile format identifier (`jpg`, `png`, `webp`).
    pub format: String,
    /// Overlap in pixels.
    pub overlap: u32,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Width of the original source raster.
    pub width: u32,
    /// Height of the original source raster.
    pub height: u32,
}

impl PyramidDescriptor {
    pub fn new(geometry: &TileGeometry, width: u32, height: u32) -> Self {
        Self {
            format: geometry.encoding.as_str().to_string(),
            overlap: geometry.overlap,
            tile_size: geometry.tile_size,
            width,
            height,
        }
    }

    /// Serialize in the requested document format.
    pub fn to_bytes(&self, format: DescriptorFormat) -> PyramidResult<Vec<u8>> {
        match format {
            DescriptorFormat::Xml => self.to_xml(),
            DescriptorFormat::Json => self.to_json(),
        }
    }

    /// Serialize as Deep Zoom XML.
    pub fn to_xml(&self) -> PyramidResult<Vec<u8>> {
        let overlap = self.overlap.to_string();
        let tile_size = self.tile_size.to_string();
        let width = self.width.to_string();
        let height = self.height.to_string();

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(serialize_err)?;

        let mut image = BytesStart::new("Image");
        image.push_attribute(("xmlns", DZI_NAMESPACE));
        image.push_attribute(("Format", self.format.as_str()));
        image.push_attribute(("Overlap", overlap.as_str()));
        image.push_attribute(("TileSize", tile_size.as_str()));
        writer.write_event(Event::Start(image)).map_err(serialize_err)?;

        let mut size = BytesStart::new("Size");
        size.push_attribute(("Width", width.as_str()));
        size.push_attribute(("Height", height.as_str()));
        writer.write_event(Event::Empty(size)).map_err(serialize_err)?;

        writer
            .write_event(Event::End(BytesEnd::new("Image")))
            .map_err(serialize_err)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Serialize as OpenSeadragon-style JSON (`{"Image": {...}}`).
    pub fn to_json(&self) -> PyramidResult<Vec<u8>> {
        let doc = JsonDocument {
            image: JsonImage {
                xmlns: DZI_NAMESPACE.to_string(),
                format: self.format.clone(),
                overlap: self.overlap,
                tile_size: self.tile_size,
                size: JsonSize {
                    width: self.width,
                    height: self.height,
                },
            },
        };
        let mut bytes = serde_json::to_vec_pretty(&doc).map_err(serialize_err)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Parse a Deep Zoom XML document.
    pub fn parse_xml(xml: &str) -> PyramidResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut format = None;
        let mut overlap = None;
        let mut tile_size = None;
        let mut width = None;
        let mut height = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"Image" => {
                        for (key, value) in attributes(&e)? {
                            match key.as_str() {
                                "Format" => format = Some(value),
                                "Overlap" => overlap = Some(parse_number("Overlap", &value)?),
                                "TileSize" => tile_size = Some(parse_number("TileSize", &value)?),
                                _ => {}
                            }
                        }
                    }
                    b"Size" => {
                        for (key, value) in attributes(&e)? {
                            match key.as_str() {
                                "Width" => width = Some(parse_number("Width", &value)?),
                                "Height" => height = Some(parse_number("Height", &value)?),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(PyramidError::DescriptorParse(format!(
                        "XML error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            format: format.ok_or_else(|| missing("Format"))?,
            overlap: overlap.ok_or_else(|| missing("Overlap"))?,
            tile_size: tile_size.ok_or_else(|| missing("TileSize"))?,
            width: width.ok_or_else(|| missing("Width"))?,
            height: height.ok_or_else(|| missing("Height"))?,
        })
    }

    /// Parse an OpenSeadragon-style JSON document.
    pub fn parse_json(json: &str) -> PyramidResult<Self> {
        let doc: JsonDocument = serde_json::from_str(json)?;
        Ok(Self {
            format: doc.image.format,
            overlap: doc.image.overlap,
            tile_size: doc.image.tile_size,
            width: doc.image.size.width,
            height: doc.image.size.height,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct JsonDocument {
    #[serde(rename = "Image")]
    image: JsonImage,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonImage {
    #[serde(rename = "xmlns", default)]
    xmlns: String,
    format: String,
    #[serde(deserialize_with = "number_or_string")]
    overlap: u32,
    #[serde(deserialize_with = "number_or_string")]
    tile_size: u32,
    size: JsonSize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonSize {
    #[serde(deserialize_with = "number_or_string")]
    width: u32,
    #[serde(deserialize_with = "number_or_string")]
    height: u32,
}

/// OpenSeadragon accepts both `"256"` and `256` in JSON descriptors.
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn attributes(e: &BytesStart<'_>) -> PyramidResult<Vec<(String, String)>> {
    e.attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| PyramidError::DescriptorParse(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| PyramidError::DescriptorParse(e.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn serialize_err(e: impl std::fmt::Display) -> PyramidError {
    PyramidError::DescriptorSerialize(e.to_string())
}

fn parse_number(name: &str, value: &str) -> PyramidResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| PyramidError::DescriptorParse(format!("{} is not an integer: '{}'", name, value)))
}

fn missing(name: &str) -> PyramidError {
    PyramidError::DescriptorParse(format!("missing attribute {}", name))
}

/// Location of the descriptor for a tile root: `<parent>/<root name>.<ext>`.
pub fn descriptor_path(output_root: &Path, format: DescriptorFormat) -> Option<PathBuf> {
    let name = output_root.file_name()?;
    let mut file_name = name.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    let parent = output_root.parent().unwrap_or_else(|| Path::new(""));
    Some(parent.join(file_name))
}

/// Persists the descriptor next to the tile root.
pub struct DescriptorWriter<'a> {
    storage: &'a dyn TileStorage,
    format: DescriptorFormat,
}

impl<'a> DescriptorWriter<'a> {
    pub fn new(storage: &'a dyn TileStorage, format: DescriptorFormat) -> Self {
        Self { storage, format }
    }

    /// Serialize and write `descriptor`. Returns the descriptor path.
    #[instrument(skip(self, descriptor), fields(root = %output_root.display()))]
    pub fn write(&self, descriptor: &PyramidDescriptor, output_root: &Path) -> PyramidResult<PathBuf> {
        let path = descriptor_path(output_root, self.format).ok_or_else(|| {
            PyramidError::descriptor_write(output_root, "output root has no file name")
        })?;

        let bytes = descriptor
            .to_bytes(self.format)
            .map_err(|e| PyramidError::descriptor_write(&path, e))?;

        self.storage
            .write_file(&path, &bytes)
            .map_err(|e| PyramidError::descriptor_write(&path, e))?;

        info!(path = %path.display(), "Descriptor written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStorage;
    use deepzoom_common::TileEncoding;

    fn sample() -> PyramidDescriptor {
        PyramidDescriptor::new(&TileGeometry::new(256, 1, TileEncoding::Jpeg), 1000, 600)
    }

    #[test]
    fn test_xml_document() {
        let xml = String::from_utf8(sample().to_xml().unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("xmlns=\"http://schemas.microsoft.com/deepzoom/2008\""));
        assert!(xml.contains("Format=\"jpg\""));
        assert!(xml.contains("Overlap=\"1\""));
        assert!(xml.contains("TileSize=\"256\""));
        assert!(xml.contains("<Size Width=\"1000\" Height=\"600\"/>"));
        assert!(xml.trim_end().ends_with("</Image>"));
    }

    #[test]
    fn test_xml_parses_back() {
        let xml = String::from_utf8(sample().to_xml().unwrap()).unwrap();
        assert_eq!(PyramidDescriptor::parse_xml(&xml).unwrap(), sample());
    }

    #[test]
    fn test_parse_single_line_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?><Image xmlns="http://schemas.microsoft.com/deepzoom/2008" Format="png" Overlap="0" TileSize="510"><Size Width="20000" Height="3"/></Image>"#;
        let descriptor = PyramidDescriptor::parse_xml(xml).unwrap();
        assert_eq!(descriptor.format, "png");
        assert_eq!(descriptor.overlap, 0);
        assert_eq!(descriptor.tile_size, 510);
        assert_eq!((descriptor.width, descriptor.height), (20000, 3));
    }

    #[test]
    fn test_parse_xml_missing_size() {
        let xml = r#"<Image Format="jpg" Overlap="1" TileSize="256"></Image>"#;
        assert!(matches!(
            PyramidDescriptor::parse_xml(xml),
            Err(PyramidError::DescriptorParse(_))
        ));
    }

    #[test]
    fn test_json_document_parses_back() {
        let json = String::from_utf8(sample().to_json().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Image"]["TileSize"], 256);
        assert_eq!(value["Image"]["Size"]["Width"], 1000);
        assert_eq!(PyramidDescriptor::parse_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_json_accepts_string_numbers() {
        let json = r#"{"Image": {"Format": "jpg", "Overlap": "1", "TileSize": "254",
                       "Size": {"Width": "4000", "Height": "3000"}}}"#;
        let descriptor = PyramidDescriptor::parse_json(json).unwrap();
        assert_eq!(descriptor.tile_size, 254);
        assert_eq!(descriptor.height, 3000);
    }

    #[test]
    fn test_descriptor_path_is_sibling_of_root() {
        assert_eq!(
            descriptor_path(Path::new("output/deepzoom_tiles"), DescriptorFormat::Xml),
            Some(PathBuf::from("output/deepzoom_tiles.dzi"))
        );
        assert_eq!(
            descriptor_path(Path::new("tiles"), DescriptorFormat::Json),
            Some(PathBuf::from("tiles.json"))
        );
        assert_eq!(descriptor_path(Path::new("/"), DescriptorFormat::Xml), None);
    }

    #[test]
    fn test_serialization_errors_are_not_parse_errors() {
        let err = serialize_err("writer closed");
        assert!(matches!(err, PyramidError::DescriptorSerialize(_)));
        assert_eq!(err.to_string(), "Failed to serialize descriptor: writer closed");
    }

    #[test]
    fn test_writer_fails_when_parent_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("missing/parent/tiles");
        let writer = DescriptorWriter::new(&FsStorage, DescriptorFormat::Xml);
        let err = writer.write(&sample(), &root).unwrap_err();
        assert!(matches!(err, PyramidError::DescriptorWrite { .. }));
    }
}
