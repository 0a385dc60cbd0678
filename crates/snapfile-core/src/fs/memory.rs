//! In-memory filesystem
//!
//! Keeps files and directories in a map. Creating a file requires its
//! parent directory to exist, mirroring the real disk.

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::FileSystem;

#[derive(Debug, Default)]
struct MemState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl MemState {
    fn has_dir(&self, path: &Path) -> bool {
        is_root(path) || self.dirs.contains(path)
    }
}

/// [`FileSystem`] held entirely in memory
#[derive(Debug, Default)]
pub struct MemFs {
    state: Mutex<MemState>,
}

impl MemFs {
    /// Create an empty in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently stored
    pub fn file_count(&self) -> usize {
        self.state().map(|s| s.files.len()).unwrap_or(0)
    }

    fn state(&self) -> io::Result<MutexGuard<'_, MemState>> {
        self.state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory filesystem lock poisoned"))
    }
}

impl FileSystem for MemFs {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        let state = self.state()?;
        Ok(state.files.contains_key(path) || state.has_dir(path))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let state = self.state()?;
        match state.files.get(path) {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None if state.has_dir(path) => Err(is_a_directory(path)),
            None => Err(not_found(path)),
        }
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let mut state = self.state()?;
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !state.has_dir(parent) {
            return Err(not_found(parent));
        }
        if state.has_dir(path) {
            return Err(is_a_directory(path));
        }
        state.files.insert(path.to_path_buf(), Vec::new());

        Ok(Box::new(MemFile {
            fs: self,
            path: path.to_path_buf(),
        }))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state()?;
        for dir in path.ancestors().filter(|p| !is_root(p)) {
            if state.files.contains_key(dir) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("'{}' exists and is not a directory", dir.display()),
                ));
            }
            state.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }
}

/// Writable handle that appends straight into the owning [`MemFs`]
struct MemFile<'a> {
    fs: &'a MemFs,
    path: PathBuf,
}

impl Write for MemFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.fs.state()?;
        state
            .files
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn is_root(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.parent().is_none()
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("'{}' is a directory", path.display()),
    )
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("'{}' does not exist", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("/snaps")).unwrap();
        fs.write(Path::new("/snaps/a.snap"), b"hello").unwrap();

        assert_eq!(fs.read(Path::new("/snaps/a.snap")).unwrap(), b"hello");
        assert_eq!(fs.file_count(), 1);
    }

    #[test]
    fn test_create_requires_parent_directory() {
        let fs = MemFs::new();
        let err = fs.create(Path::new("/missing/a.snap")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_relative_file_in_current_directory() {
        let fs = MemFs::new();
        fs.write(Path::new("a.snap"), b"x").unwrap();
        assert!(fs.exists(Path::new("a.snap")).unwrap());
    }

    #[test]
    fn test_create_dir_all_registers_ancestors() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("/a/b/c")).unwrap();

        assert!(fs.exists(Path::new("/a")).unwrap());
        assert!(fs.exists(Path::new("/a/b")).unwrap());
        assert!(fs.exists(Path::new("/a/b/c")).unwrap());
        assert!(!fs.exists(Path::new("/a/b/c/d")).unwrap());
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let fs = MemFs::new();
        let err = fs.read(Path::new("/nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let fs = MemFs::new();
        let dir = Path::new("/s/suite.toml");
        fs.create_dir_all(dir).unwrap();

        let err = fs.read(dir).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("is a directory"));

        assert!(fs.create(dir).is_err());
        assert_eq!(fs.file_count(), 0);
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("/d")).unwrap();
        fs.write(Path::new("/d/f"), b"first and longer").unwrap();
        fs.write(Path::new("/d/f"), b"second").unwrap();

        assert_eq!(fs.read(Path::new("/d/f")).unwrap(), b"second");
    }
}
