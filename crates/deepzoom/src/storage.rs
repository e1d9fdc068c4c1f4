//! Storage backends for tiles and descriptors.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, instrument};

/// Minimal storage interface the builder writes through.
pub trait TileStorage: Send + Sync {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Write `data` to `path`, replacing any existing file.
    fn write_file(&self, path: &Path, data: &[u8]) -> std::io::Result<()>;

    /// Delete the file at `path`.
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;
}

/// Local filesystem storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl TileStorage for FsStorage {
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        fs::create_dir_all(path)
    }

    #[instrument(skip(self, data), fields(path = %path.display()))]
    fn write_file(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        debug!(size = data.len(), "Writing file");
        let mut file = fs::File::create(path)?;
        file.write_all(data)?;
        file.flush()
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }
}

/// Verify that `root` exists (creating it if needed) and accepts writes.
///
/// A zero-byte probe file is written and removed so that a read-only
/// directory is detected before any level work starts.
pub fn ensure_writable_dir(storage: &dyn TileStorage, root: &Path) -> std::io::Result<()> {
    storage.create_dir_all(root)?;

    let probe = root.join(".deepzoom-write-probe");
    storage.write_file(&probe, &[])?;
    storage.remove_file(&probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c");
        let storage = FsStorage::new();
        storage.create_dir_all(&target).unwrap();
        storage.create_dir_all(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_write_file_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.bin");
        let storage = FsStorage::new();
        storage.write_file(&path, b"first").unwrap();
        storage.write_file(&path, b"2nd").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"2nd");
    }

    #[test]
    fn test_ensure_writable_dir_leaves_root_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pyramid");
        ensure_writable_dir(&FsStorage, &root).unwrap();
        assert!(root.is_dir());
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
    }

    /// Records removals instead of touching the filesystem.
    #[derive(Default)]
    struct RecordingStorage {
        removed: std::sync::Mutex<Vec<std::path::PathBuf>>,
    }

    impl TileStorage for RecordingStorage {
        fn create_dir_all(&self, _path: &Path) -> std::io::Result<()> {
            Ok(())
        }

        fn write_file(&self, _path: &Path, _data: &[u8]) -> std::io::Result<()> {
            Ok(())
        }

        fn remove_file(&self, path: &Path) -> std::io::Result<()> {
            self.removed.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_ensure_writable_dir_cleans_up_through_storage() {
        let storage = RecordingStorage::default();
        ensure_writable_dir(&storage, Path::new("virtual/pyramid")).unwrap();
        assert_eq!(
            *storage.removed.lock().unwrap(),
            vec![Path::new("virtual/pyramid").join(".deepzoom-write-probe")]
        );
    }

    #[test]
    fn test_ensure_writable_dir_under_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_writable_dir(&FsStorage, &file.join("pyramid")).is_err());
        assert!(ensure_writable_dir(&FsStorage, &file).is_err());
    }
}
