//! Wiki configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main wiki configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Shown in the page header and the browser title
    pub title: String,

    // Directory
    pub entries_dir: String,
    pub static_dir: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            title: "Encyclopedia".to_string(),
            entries_dir: "entries".to_string(),
            static_dir: "static".to_string(),
            server: ServerConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl WikiConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        // An empty file is valid YAML `null`, treat it as all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: WikiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 8000,
        }
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
