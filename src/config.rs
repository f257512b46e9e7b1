//! Configuration file support for entsearch
//!
//! Config file location: ~/.config/entsearch/config.toml
//!
//! Example config:
//! ```toml
//! [search]
//! format = "text"  # text, json
//! limit = 50
//!
//! [state]
//! user = "alice"
//! organization = "acme"
//! # path = "/custom/state.json"
//!
//! [http]
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Filter output defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Output format: text, json
    #[serde(default = "default_format")]
    pub format: String,

    /// Maximum number of matches to print
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            limit: None,
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

/// Local state cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// User the state is scoped to
    #[serde(default = "default_user")]
    pub user: String,

    /// Organization the state is scoped to
    pub organization: Option<String>,

    /// State file location (default: <data_dir>/entsearch/state.json)
    pub path: Option<PathBuf>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            organization: None,
            path: None,
        }
    }
}

fn default_user() -> String {
    "default".to_string()
}

impl StateConfig {
    /// Resolved state file path
    pub fn state_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("entsearch")
                .join("state.json")
        })
    }
}

/// HTTP client configuration for remote entity sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("entsearch")
            .join("config.toml")
    }

    /// Load config from file, returning defaults if not found
    pub fn load() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Write the commented example config. Returns false if a file exists and
    /// `overwrite` is not set.
    pub fn write_example(overwrite: bool) -> anyhow::Result<bool> {
        let path = Self::config_path();
        if path.exists() && !overwrite {
            return Ok(false);
        }

        let example = r#"# entsearch configuration
# Location: ~/.config/entsearch/config.toml

[search]
# Output format: text, json
format = "text"

# Maximum number of matches to print (default: unlimited)
# limit = 50

[state]
# User and organization the saved state is scoped to
user = "default"
# organization = "acme"

# State file (default: <data dir>/entsearch/state.json)
# path = "/path/to/state.json"

[http]
# Timeout for remote entity sources, in seconds
timeout_secs = 30
"#;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, example)?;
        Ok(true)
    }
}
