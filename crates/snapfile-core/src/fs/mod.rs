//! Filesystem capability
//!
//! Stores never touch `std::fs` directly. They are handed a [`FileSystem`]
//! value at construction so callers can choose the real disk, an in-memory
//! filesystem, or a read-cached overlay.
//!
//! - [`OsFs`]: the operating system filesystem
//! - [`MemFs`]: in-memory files and directories
//! - [`CachedFs`]: time-bounded read cache over another filesystem

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

mod cache;
mod memory;
mod os;

pub use cache::CachedFs;
pub use memory::MemFs;
pub use os::OsFs;

/// Filesystem operations consumed by snapshot stores.
///
/// Missing files are reported as [`io::ErrorKind::NotFound`].
pub trait FileSystem {
    /// Returns `true` if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Opens an existing file for reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Creates a file for writing, truncating any existing content.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    /// Ensures a directory exists, creating parents as needed.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Reads the whole file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut file = self.open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Replaces the whole file at `path` with `data`.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut file = self.create(path)?;
        file.write_all(data)?;
        file.flush()
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        (**self).exists(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        (**self).create(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        (**self).write(path, data)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for Arc<F> {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        (**self).exists(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        (**self).create(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        (**self).write(path, data)
    }
}

/// Shared, type-erased filesystem handle
pub type SharedFs = Arc<dyn FileSystem + Send + Sync>;
