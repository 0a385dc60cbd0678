//! Storage layer
//!
//! Persists snapshot payloads through a [`FileSystem`].
//!
//! ## Layouts
//!
//! - **Single file**: one snapshot per file, the payload is the whole file
//! - **Suite file**: many named snapshots in one TOML document
//!
//! Both implement [`SnapshotStore`]. Every call touches the filesystem;
//! nothing is cached between calls.

pub mod document;
pub mod error;
pub mod single;
pub mod suite;

use std::path::{Path, PathBuf};

use crate::fs::FileSystem;

pub use document::SuiteDocument;
pub use error::{StorageError, StorageResult};
pub use single::SingleFileStore;
pub use suite::{load_suite, SuiteFileStore};

/// Read and write access to one snapshot
pub trait SnapshotStore {
    /// Read the recorded snapshot
    ///
    /// Fails with a not-found error (see [`StorageError::is_not_found`])
    /// when nothing has been recorded yet.
    fn read(&self) -> StorageResult<Vec<u8>>;

    /// Record `data`, replacing any previous snapshot
    ///
    /// Missing parent directories are created.
    fn write(&self, data: &[u8]) -> StorageResult<()>;
}

/// A snapshot location in either layout, chosen when it is constructed
pub enum Storage<F> {
    Single(SingleFileStore<F>),
    Suite(SuiteFileStore<F>),
}

impl<F: FileSystem> Storage<F> {
    /// One snapshot stored as the whole file at `path`
    pub fn single(fs: F, path: impl Into<PathBuf>) -> Self {
        Storage::Single(SingleFileStore::new(fs, path))
    }

    /// Snapshot `name` inside the suite document at `path`
    pub fn suite(fs: F, path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Storage::Suite(SuiteFileStore::new(fs, path, name))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        match self {
            Storage::Single(store) => store.path(),
            Storage::Suite(store) => store.path(),
        }
    }
}

impl<F: FileSystem> SnapshotStore for Storage<F> {
    fn read(&self) -> StorageResult<Vec<u8>> {
        match self {
            Storage::Single(store) => store.read(),
            Storage::Suite(store) => store.read(),
        }
    }

    fn write(&self, data: &[u8]) -> StorageResult<()> {
        match self {
            Storage::Single(store) => store.write(data),
            Storage::Suite(store) => store.write(data),
        }
    }
}

/// Create the directory chain above `path`
fn ensure_parent_dir<F: FileSystem>(fs: &F, path: &Path) -> StorageResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs.create_dir_all(parent)
                .map_err(|source| StorageError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })
        }
        _ => Ok(()),
    }
}
