//! Storage error handling
//!
//! Provides typed errors for snapshot storage with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during snapshot storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing file does not exist
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Suite document exists but holds no entry for the requested name
    #[error("Snapshot '{name}' not found in '{path}'")]
    SnapshotNotFound { path: PathBuf, name: String },

    /// Suite document exists but cannot be parsed
    #[error("Invalid document format in '{path}': {details}")]
    InvalidFormat { path: PathBuf, details: String },

    /// Payload cannot be stored as suite document text
    #[error("Snapshot '{name}' for '{path}' is not valid UTF-8 text")]
    InvalidUtf8 { path: PathBuf, name: String },

    /// Failed to create parent directories
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Create an error from an I/O error raised while reading `path`
    ///
    /// A missing file becomes [`StorageError::NotFound`].
    pub fn from_read_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound { path },
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ => StorageError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Create an error from an I/O error raised while writing `path`
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_write_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// True when no snapshot has been recorded yet (file or suite entry absent)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NotFound { .. } | StorageError::SnapshotNotFound { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::NotFound { .. } | StorageError::SnapshotNotFound { .. } => {
                Some("No snapshot has been recorded yet. Write one first.")
            }
            StorageError::InvalidFormat { .. } => {
                Some("The suite file was edited or damaged. Restore it from version control or delete it to re-record.")
            }
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Check file and directory permissions. You may need to run with different permissions or change ownership.")
            }
            StorageError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
