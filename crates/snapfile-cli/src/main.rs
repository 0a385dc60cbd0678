//! snapfile CLI
//!
//! Command-line interface for inspecting and recording golden snapshots.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use snapfile_core::Config;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "snapfile")]
#[command(about = "snapfile - Golden snapshot files for snapshot tests")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long = "config", global = true, value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Snapshot directory (overrides config)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a recorded snapshot
    #[command(alias = "cat")]
    Read {
        /// Snapshot name
        name: String,
        /// Read from this suite document instead of a single file
        #[arg(short, long)]
        suite: Option<String>,
    },
    /// Record a snapshot
    #[command(alias = "record")]
    Write {
        /// Snapshot name
        name: String,
        /// Write into this suite document instead of a single file
        #[arg(short, long)]
        suite: Option<String>,
        /// Read the payload from a file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// List snapshot names in a suite document
    #[command(alias = "ls")]
    List {
        /// Suite name
        suite: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (snapshot_dir, extension, suite_extension, read_cache_ttl_secs)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the file itself, not the loaded snapshot settings
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config_file.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config_file.as_ref())?;
    if let Some(dir) = cli.dir {
        config.snapshot_dir = dir;
    }
    debug!(
        "Snapshot directory {:?}, read cache {:?}",
        config.snapshot_dir,
        config.read_cache_ttl()
    );
    let fs = config.filesystem();

    match cli.command {
        Commands::Read { name, suite } => {
            commands::snapshot::read(&config, fs, &name, suite.as_deref(), &output)
        }
        Commands::Write { name, suite, input } => {
            commands::snapshot::write(&config, fs, &name, suite.as_deref(), input, &output)
        }
        Commands::List { suite } => commands::snapshot::list(&config, fs, &suite, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Log to stderr so stdout carries only command output
///
/// `RUST_LOG` takes precedence over the `-v` flags.
fn init_logging(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("snapfile_core={},snapfile_cli={}", level, level))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
