// src/config.rs

//! Configuration loading utilities.
//!
//! A run needs two things: the TOML [`Config`] (all optional, defaults
//! apply) and the [`Secrets`] read from the environment (all required).

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, Secrets};

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file is missing or does not parse.
pub fn load_config(path: &Path) -> Config {
    Config::load_or_default(path)
}

/// Load and validate both the config file and the environment secrets.
pub fn load_all(config_path: &Path) -> Result<(Config, Secrets)> {
    let config = load_config(config_path);
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config: {e}")))?;

    let secrets = Secrets::from_env()?;

    Ok((config, secrets))
}
