//! One snapshot per file

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ensure_parent_dir, SnapshotStore, StorageError, StorageResult};
use crate::fs::FileSystem;

/// Stores a snapshot as the entire contents of one file
pub struct SingleFileStore<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> SingleFileStore<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F: FileSystem> SnapshotStore for SingleFileStore<F> {
    fn read(&self) -> StorageResult<Vec<u8>> {
        debug!("Reading snapshot file {:?}", self.path);

        self.fs
            .read(&self.path)
            .map_err(|e| StorageError::from_read_io(e, self.path.clone()))
    }

    fn write(&self, data: &[u8]) -> StorageResult<()> {
        debug!(
            "Writing {} bytes to snapshot file {:?}",
            data.len(),
            self.path
        );

        ensure_parent_dir(&self.fs, &self.path)?;
        self.fs
            .write(&self.path, data)
            .map_err(|e| StorageError::from_write_io(e, self.path.clone()))
    }
}
