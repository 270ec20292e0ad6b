//! Shim configuration.
//!
//! Defaults reproduce the devbox constants (loopback proxy on port 20280,
//! `/usr/bin/git`, `~/.devbox/managed_dirs`); an optional TOML file at
//! `~/.config/grs/config.toml` overrides them. The `GRS_CONFIG` env var
//! points at an alternate file so tests can substitute a fake endpoint
//! and a fake git binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ShimError;

/// Top-level shim configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShimConfig {
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Where the proxy daemon listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Loopback host the daemon binds.
    #[serde(default = "default_host")]
    pub host: String,
    /// Daemon port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// The real git binary the shim stands in for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Absolute path to the fallback git binary.
    #[serde(default = "default_real_binary")]
    pub real_binary: String,
}

/// Where the syncer records managed directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// File listing managed directory roots, one per line.
    #[serde(default = "default_managed_dirs_file")]
    pub managed_dirs_file: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    20280
}

fn default_real_binary() -> String {
    "/usr/bin/git".to_string()
}

fn default_managed_dirs_file() -> String {
    "~/.devbox/managed_dirs".to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            real_binary: default_real_binary(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            managed_dirs_file: default_managed_dirs_file(),
        }
    }
}

impl ProxyConfig {
    /// `host:port` string for the socket connect.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ShimConfig {
    /// Managed-directory list path with `~` expanded.
    pub fn managed_dirs_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.sync.managed_dirs_file).into_owned())
    }

    /// Real git binary path with `~` expanded.
    pub fn real_git_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.git.real_binary).into_owned())
    }
}

/// Path the config is loaded from: `$GRS_CONFIG` if set, else
/// `~/.config/grs/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("GRS_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("grs")
        .join("config.toml")
}

/// Load the shim configuration from the default location.
pub fn load_config() -> Result<ShimConfig, ShimError> {
    load_config_from(&config_path())
}

/// Load the shim configuration from `path`.
///
/// An absent file is not an error and yields the defaults; a present but
/// unreadable or unparsable file is.
pub fn load_config_from(path: &Path) -> Result<ShimConfig, ShimError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ShimConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|err| ShimError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let config: ShimConfig = toml::from_str(&content).map_err(|err| ShimError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(config)
}
