//! Many named snapshots in one suite document
//!
//! Each write reloads the whole document, updates one entry and rewrites
//! the file. There is no locking: two processes writing different names
//! to the same suite file at once can lose one of the updates.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ensure_parent_dir, SnapshotStore, StorageError, StorageResult, SuiteDocument};
use crate::fs::FileSystem;

/// Stores the snapshot `name` inside the suite document at `path`
pub struct SuiteFileStore<F> {
    fs: F,
    path: PathBuf,
    name: String,
}

impl<F: FileSystem> SuiteFileStore<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            fs,
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and decode the whole suite document
    pub fn load(&self) -> StorageResult<SuiteDocument> {
        load_suite(&self.fs, &self.path)
    }

    /// Names of all snapshots in the suite, in ascending order
    pub fn names(&self) -> StorageResult<Vec<String>> {
        Ok(self.load()?.names().map(String::from).collect())
    }
}

/// Load and decode the suite document at `path`
///
/// Returns [`StorageError::NotFound`] if the file does not exist and
/// [`StorageError::InvalidFormat`] if it exists but cannot be parsed.
pub fn load_suite<F: FileSystem>(fs: &F, path: &Path) -> StorageResult<SuiteDocument> {
    let exists = fs
        .exists(path)
        .map_err(|e| StorageError::from_read_io(e, path.to_path_buf()))?;

    if !exists {
        return Err(StorageError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs
        .read(path)
        .map_err(|e| StorageError::from_read_io(e, path.to_path_buf()))?;

    let text = String::from_utf8(bytes).map_err(|e| StorageError::InvalidFormat {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    SuiteDocument::decode(&text).map_err(|e| StorageError::InvalidFormat {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

impl<F: FileSystem> SnapshotStore for SuiteFileStore<F> {
    fn read(&self) -> StorageResult<Vec<u8>> {
        debug!("Reading snapshot {:?} from suite {:?}", self.name, self.path);

        let document = self.load()?;
        match document.get(&self.name) {
            Some(value) => Ok(value.as_bytes().to_vec()),
            None => Err(StorageError::SnapshotNotFound {
                path: self.path.clone(),
                name: self.name.clone(),
            }),
        }
    }

    fn write(&self, data: &[u8]) -> StorageResult<()> {
        debug!(
            "Writing {} bytes as snapshot {:?} to suite {:?}",
            data.len(),
            self.name,
            self.path
        );

        let mut document = match self.load() {
            Ok(document) => document,
            Err(StorageError::NotFound { .. }) => SuiteDocument::default(),
            Err(e) => return Err(e),
        };

        let value = String::from_utf8(data.to_vec()).map_err(|_| StorageError::InvalidUtf8 {
            path: self.path.clone(),
            name: self.name.clone(),
        })?;
        document.insert(self.name.clone(), value);

        ensure_parent_dir(&self.fs, &self.path)?;

        let file = self
            .fs
            .create(&self.path)
            .map_err(|e| StorageError::from_write_io(e, self.path.clone()))?;

        document
            .encode(file)
            .map_err(|e| StorageError::from_write_io(e, self.path.clone()))
    }
}
