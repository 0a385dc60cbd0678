//! Read cache overlay
//!
//! Serves repeated reads of the same file from memory for a bounded time.
//! Writes go straight to the base filesystem and drop the cached copy.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::trace;

use super::FileSystem;

struct CacheEntry {
    loaded_at: Instant,
    data: Vec<u8>,
}

/// [`FileSystem`] that caches file contents read from `F` for `ttl`
pub struct CachedFs<F> {
    base: F,
    ttl: Duration,
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl<F: FileSystem> CachedFs<F> {
    /// Wrap `base`, keeping read results for `ttl`
    pub fn new(base: F, ttl: Duration) -> Self {
        Self {
            base,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> io::Result<MutexGuard<'_, HashMap<PathBuf, CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "read cache lock poisoned"))
    }

    fn is_cached(&self, path: &Path) -> io::Result<bool> {
        let entries = self.entries()?;
        Ok(entries
            .get(path)
            .is_some_and(|entry| entry.loaded_at.elapsed() < self.ttl))
    }

    fn cached(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        let mut entries = self.entries()?;
        match entries.get(path) {
            Some(entry) if entry.loaded_at.elapsed() < self.ttl => {
                trace!("Read cache hit for {:?}", path);
                Ok(Some(entry.data.clone()))
            }
            Some(_) => {
                entries.remove(path);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl<F: FileSystem> FileSystem for CachedFs<F> {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        if self.is_cached(path)? {
            return Ok(true);
        }
        self.base.exists(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.read(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        self.entries()?.remove(path);
        self.base.create(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.base.create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if let Some(data) = self.cached(path)? {
            return Ok(data);
        }

        trace!("Read cache miss for {:?}", path);
        let data = self.base.read(path)?;
        self.entries()?.insert(
            path.to_path_buf(),
            CacheEntry {
                loaded_at: Instant::now(),
                data: data.clone(),
            },
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemFs;
    use std::sync::Arc;

    #[test]
    fn test_serves_cached_copy_within_ttl() {
        let base = Arc::new(MemFs::new());
        let cached = CachedFs::new(Arc::clone(&base), Duration::from_secs(60));
        let path = Path::new("golden.snap");

        base.write(path, b"v1").unwrap();
        assert_eq!(cached.read(path).unwrap(), b"v1");

        // Changed behind the cache's back
        base.write(path, b"v2").unwrap();
        assert_eq!(cached.read(path).unwrap(), b"v1");
    }

    #[test]
    fn test_expired_entry_is_reloaded() {
        let base = Arc::new(MemFs::new());
        let cached = CachedFs::new(Arc::clone(&base), Duration::ZERO);
        let path = Path::new("golden.snap");

        base.write(path, b"v1").unwrap();
        assert_eq!(cached.read(path).unwrap(), b"v1");

        base.write(path, b"v2").unwrap();
        assert_eq!(cached.read(path).unwrap(), b"v2");
    }

    #[test]
    fn test_write_through_invalidates() {
        let base = Arc::new(MemFs::new());
        let cached = CachedFs::new(Arc::clone(&base), Duration::from_secs(60));
        let path = Path::new("golden.snap");

        cached.write(path, b"v1").unwrap();
        assert_eq!(cached.read(path).unwrap(), b"v1");

        cached.write(path, b"v2").unwrap();
        assert_eq!(cached.read(path).unwrap(), b"v2");
        assert_eq!(base.read(path).unwrap(), b"v2");
    }

    #[test]
    fn test_exists_answers_from_cache() {
        let base = Arc::new(MemFs::new());
        let cached = CachedFs::new(Arc::clone(&base), Duration::from_secs(60));
        let path = Path::new("golden.snap");

        base.write(path, b"v1").unwrap();
        cached.read(path).unwrap();
        assert!(cached.is_cached(path).unwrap());
        assert!(cached.exists(path).unwrap());

        // Expired entries do not count
        let expired = CachedFs::new(Arc::clone(&base), Duration::ZERO);
        expired.read(path).unwrap();
        assert!(!expired.is_cached(path).unwrap());
        assert!(expired.exists(path).unwrap());
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let base = Arc::new(MemFs::new());
        let cached = CachedFs::new(Arc::clone(&base), Duration::from_secs(60));
        let path = Path::new("later.snap");

        assert_eq!(
            cached.read(path).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert!(!cached.exists(path).unwrap());

        base.write(path, b"now here").unwrap();
        assert!(cached.exists(path).unwrap());
        assert_eq!(cached.read(path).unwrap(), b"now here");
    }
}
