//! Configuration module for rnw

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::telegraph::DEFAULT_API_URL;
use crate::paths;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Page service endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account short name (also the key of the stored token)
    #[serde(default = "default_short_name")]
    pub short_name: String,

    /// Name shown as the author of posts
    #[serde(default = "default_author_name")]
    pub author_name: String,

    /// Posts per feed page
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Pages to warm after showing a feed, and the `prefetch` command default (0 = off)
    #[serde(default = "default_prefetch_pages")]
    pub prefetch_pages: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Longest post accepted by the CLI, in characters
    #[serde(default = "default_max_post_chars")]
    pub max_post_chars: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn login_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "rnw".to_string())
}

fn default_short_name() -> String {
    login_name()
}

fn default_author_name() -> String {
    login_name()
}

fn default_page_size() -> u64 {
    20
}

fn default_prefetch_pages() -> u64 {
    2
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_post_chars() -> usize {
    280
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            short_name: default_short_name(),
            author_name: default_author_name(),
            page_size: default_page_size(),
            prefetch_pages: default_prefetch_pages(),
            request_timeout_secs: default_request_timeout(),
            max_post_chars: default_max_post_chars(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Request timeout as a duration
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
