//! Common types shared across the deep-zoom workspace.

pub mod encoding;
pub mod error;
pub mod tile;

pub use encoding::{TileEncoding, TileGeometry};
pub use error::{PyramidError, PyramidResult};
pub use tile::{TileBounds, TileCoord};
