//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use snapfile_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "snapshot_dir": config.snapshot_dir,
                    "extension": config.extension,
                    "suite_extension": config.suite_extension,
                    "read_cache_ttl_secs": config.read_cache_ttl_secs
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.snapshot_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  snapshot_dir:        {}", config.snapshot_dir.display());
            println!("  extension:           {}", config.extension);
            println!("  suite_extension:     {}", config.suite_extension);
            println!(
                "  read_cache_ttl_secs: {}",
                match config.read_cache_ttl_secs {
                    0 => "0 (disabled)".to_string(),
                    secs => secs.to_string(),
                }
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "snapshot_dir" => {
            config.snapshot_dir = value.into();
        }
        "extension" => {
            config.extension = value.trim_start_matches('.').to_string();
        }
        "suite_extension" => {
            config.suite_extension = value.trim_start_matches('.').to_string();
        }
        "read_cache_ttl_secs" => {
            config.read_cache_ttl_secs = value
                .parse()
                .context("Invalid value for read_cache_ttl_secs. Use a number of seconds.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: snapshot_dir, extension, suite_extension, read_cache_ttl_secs",
                key
            );
        }
    }
    Ok(())
}
