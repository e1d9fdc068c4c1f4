//! Output locations and tile listing.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Fresh temporary directory and a not-yet-created tile root inside it.
///
/// The root is named `pyramid`, so the descriptor lands at
/// `<tempdir>/pyramid.dzi`.
pub fn temp_output_root() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let root = dir.path().join("pyramid");
    (dir, root)
}

/// Save `raster` as PNG inside `dir` and return its path.
pub fn write_test_png(dir: &Path, name: &str, raster: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    raster.save(&path).expect("failed to write test PNG");
    path
}

/// Every tile file under `root`, as paths relative to `root`, sorted.
///
/// Files directly in `root` (not inside a level directory) are skipped.
pub fn list_tiles(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }
    let mut tiles: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    tiles.sort();
    tiles
}

/// Tile file names inside one level directory, sorted.
pub fn tiles_in_level(root: &Path, level: u32) -> Vec<String> {
    let dir = root.join(level.to_string());
    let mut names: Vec<String> = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Level directory names under `root`, parsed and sorted numerically.
pub fn level_dirs(root: &Path) -> Vec<u32> {
    let mut levels: Vec<u32> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.file_name().to_str().and_then(|n| n.parse().ok()))
        .collect();
    levels.sort_unstable();
    levels
}
