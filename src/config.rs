//! Server configuration
//!
//! Settings come from built-in defaults, optionally overlaid by a TOML file,
//! and finally by command-line flags (applied by the binary).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// Default request body limit (100 KiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;

/// Runtime configuration for the signet server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on (0 picks an ephemeral port)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory of the sled database
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Number of request worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./signetdb")
}

const fn default_workers() -> usize {
    4
}

const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            workers: default_workers(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file; missing keys take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.workers > 0, "workers must be at least 1");
        anyhow::ensure!(self.max_body_bytes > 0, "max_body_bytes must be at least 1");
        anyhow::ensure!(!self.host.trim().is_empty(), "host must not be empty");
        Ok(())
    }

    /// `host:port` string to bind the listener to
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
