//! Common paths for rnw data storage
//!
//! All rnw data is stored under ~/.config/rnw/ on all platforms:
//! - config.toml - User configuration
//! - credentials.enc - Encrypted page-service access token
//!
//! Set `RNW_CONFIG_DIR` to use another directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const CONFIG_DIR_ENV: &str = "RNW_CONFIG_DIR";

/// Get the rnw data directory (~/.config/rnw/)
pub fn rnw_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .context("Could not determine home directory")?
            .join(".config")
            .join("rnw"),
    };
    fs::create_dir_all(&dir).context("Failed to create rnw directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/rnw/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(rnw_dir()?.join("config.toml"))
}

/// Get the credentials file path (~/.config/rnw/credentials.enc)
pub fn credentials_path() -> Result<PathBuf> {
    Ok(rnw_dir()?.join("credentials.enc"))
}
