//! Snapshot command handlers

use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use snapfile_core::{load_suite, Config, SharedFs, SnapshotStore, Storage, StorageError};

use crate::output::Output;

/// Resolve a snapshot name (and optional suite) to its store
pub fn storage(
    config: &Config,
    fs: SharedFs,
    name: &str,
    suite: Option<&str>,
) -> Storage<SharedFs> {
    match suite {
        Some(suite) => Storage::suite(fs, config.suite_path(suite), name),
        None => Storage::single(fs, config.single_path(name)),
    }
}

/// Print a recorded snapshot
pub fn read(
    config: &Config,
    fs: SharedFs,
    name: &str,
    suite: Option<&str>,
    output: &Output,
) -> Result<()> {
    let store = storage(config, fs, name, suite);

    match store.read() {
        Ok(data) => {
            output
                .print_snapshot(name, store.path(), &data)
                .context("Failed to write snapshot to stdout")?;
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            bail!("No snapshot recorded for '{}': {}", name, e)
        }
        Err(e) => Err(with_suggestion(e)),
    }
}

/// Record a snapshot from a file, or stdin when no file is given
pub fn write(
    config: &Config,
    fs: SharedFs,
    name: &str,
    suite: Option<&str>,
    input: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let data = match input {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("Failed to read input file: {:?}", path))?,
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read snapshot from stdin")?;
            data
        }
    };

    let store = storage(config, fs, name, suite);
    store.write(&data).map_err(with_suggestion)?;

    output.success(&format!(
        "Recorded '{}' ({} bytes) in {}",
        name,
        data.len(),
        store.path().display()
    ));
    Ok(())
}

/// List the snapshot names stored in a suite
pub fn list(config: &Config, fs: SharedFs, suite: &str, output: &Output) -> Result<()> {
    let path = config.suite_path(suite);

    let document = match load_suite(&fs, &path) {
        Ok(document) => document,
        Err(e) if e.is_not_found() => bail!("Suite '{}' does not exist: {}", suite, e),
        Err(e) => return Err(with_suggestion(e)),
    };

    let names: Vec<String> = document.names().map(String::from).collect();
    output.print_names(&path, &names);
    Ok(())
}

/// Attach the recovery hint, if any, to a storage error
fn with_suggestion(error: StorageError) -> anyhow::Error {
    match error.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n{}", error, hint),
        None => anyhow::Error::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use snapfile_core::MemFs;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            snapshot_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_storage_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let fs: SharedFs = Arc::new(MemFs::new());

        let single = storage(&config, Arc::clone(&fs), "case", None);
        assert!(matches!(single, Storage::Single(_)));
        assert_eq!(single.path(), temp_dir.path().join("case.snap"));

        let suite = storage(&config, fs, "case", Some("Parser"));
        assert!(matches!(suite, Storage::Suite(_)));
        assert_eq!(suite.path(), temp_dir.path().join("Parser.toml"));
    }

    #[test]
    fn test_write_from_file_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let input = temp_dir.path().join("input.txt");
        fs::write(&input, "golden output\n").unwrap();

        write(
            &config,
            config.filesystem(),
            "case",
            Some("Parser"),
            Some(input),
            &quiet(),
        )
        .unwrap();

        let store = storage(&config, config.filesystem(), "case", Some("Parser"));
        assert_eq!(store.read().unwrap(), b"golden output\n");
        read(
            &config,
            config.filesystem(),
            "case",
            Some("Parser"),
            &quiet(),
        )
        .unwrap();
        list(&config, config.filesystem(), "Parser", &quiet()).unwrap();
    }

    #[test]
    fn test_read_missing_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let err = read(&config, config.filesystem(), "absent", None, &quiet()).unwrap_err();
        assert!(err.to_string().contains("No snapshot recorded"));
    }

    #[test]
    fn test_list_missing_suite() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let err = list(&config, config.filesystem(), "Nope", &quiet()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_list_malformed_suite_has_hint() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.suite_path("Broken"), "= nope").unwrap();

        let err = list(&config, config.filesystem(), "Broken", &quiet()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid document format"));
        assert!(msg.contains("version control"));
    }
}
