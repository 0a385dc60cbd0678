//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! Snapshot payloads are written to stdout unchanged in human and quiet
//! mode so they can be piped or diffed.

use std::io::{self, Write};
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a snapshot payload
    pub fn print_snapshot(&self, name: &str, path: &Path, data: &[u8]) -> io::Result<()> {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()
            }
            OutputFormat::Json => {
                println!("{}", snapshot_json(name, path, data));
                Ok(())
            }
        }
    }

    /// Print the snapshot names of a suite
    pub fn print_names(&self, path: &Path, names: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if names.is_empty() {
                    println!("No snapshots in {}", path.display());
                    return;
                }
                for name in names {
                    println!("{}", name);
                }
                println!("\n{} snapshot(s) in {}", names.len(), path.display());
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "path": path,
                        "snapshots": names
                    })
                );
            }
            OutputFormat::Quiet => {
                for name in names {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// JSON form of a snapshot
///
/// `content` is only filled in for UTF-8 payloads; binary payloads report
/// `"utf8": false` and a null `content`.
fn snapshot_json(name: &str, path: &Path, data: &[u8]) -> serde_json::Value {
    let content = std::str::from_utf8(data).ok();
    serde_json::json!({
        "name": name,
        "path": path,
        "bytes": data.len(),
        "utf8": content.is_some(),
        "content": content
    })
}
