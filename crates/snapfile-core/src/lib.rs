//! snapfile Core Library
//!
//! Persists golden snapshots for snapshot tests, either one file per
//! snapshot or many named snapshots in a single suite document.
//!
//! # Quick Start
//!
//! ```no_run
//! use snapfile_core::{OsFs, SnapshotStore, Storage};
//!
//! let store = Storage::suite(OsFs, "testdata/snapshots/parser.toml", "empty_input");
//!
//! match store.read() {
//!     Ok(golden) => println!("{} bytes recorded", golden.len()),
//!     Err(e) if e.is_not_found() => store.write(b"first run output").unwrap(),
//!     Err(e) => panic!("{}", e),
//! }
//! ```
//!
//! # Modules
//!
//! - `storage`: snapshot stores and the suite document format
//! - `fs`: filesystem capability handed to every store
//! - `config`: snapshot directory and cache configuration

pub mod config;
pub mod fs;
pub mod storage;

pub use config::Config;
pub use fs::{CachedFs, FileSystem, MemFs, OsFs, SharedFs};
pub use storage::{
    load_suite, SingleFileStore, SnapshotStore, Storage, StorageError, StorageResult,
    SuiteDocument, SuiteFileStore,
};
