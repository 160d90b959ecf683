//! Configuration handling for the honk CLI
//!
//! Priority: CLI flags > environment (`HONK_CONFIG` names the file) > `./honk.toml` >
//! `~/.config/honk/config.toml` > defaults

use anyhow::{Context, Result};
use honk_core::HonkConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Working-directory config file
const LOCAL_CONFIG_FILE: &str = "honk.toml";

/// Resolved configuration for CLI commands
pub struct Config {
    pub honk: HonkConfig,
    pub quiet: bool,
    pub json_output: bool,
}

impl Config {
    /// Load configuration from file, environment, and CLI args
    pub fn load(common: &super::CommonArgs) -> Result<Self> {
        let file_config = match &common.config {
            // An explicit path must exist
            Some(path) => Some(load_file(path)?),
            None => default_config_path()
                .map(|path| load_file(&path))
                .transpose()?,
        };
        let mut honk = file_config.unwrap_or_default();

        if let Some(max) = common.max_log_circuit_size {
            honk.max_log_circuit_size = max;
        }
        if let Some(label) = &common.generator_label {
            honk.generator_label = label.clone();
        }
        log::debug!(
            "setup: max log size {}, label {:?}",
            honk.max_log_circuit_size,
            honk.generator_label
        );

        Ok(Self {
            honk,
            quiet: common.quiet,
            json_output: common.output == super::OutputFormat::Json,
        })
    }
}

fn load_file(path: &Path) -> Result<HonkConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

fn parse_config(content: &str) -> Result<HonkConfig> {
    Ok(toml::from_str(content)?)
}

/// First existing file among `./honk.toml` and the user config directory
fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("honk").join("config.toml"))
        .filter(|path| path.exists())
}
