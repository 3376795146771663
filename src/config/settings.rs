//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables → CLI args

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Platform tag selecting `sessions-<platform>.yml` (detected when unset)
    pub platform: Option<String>,

    /// Directory holding the default session files (config dir when unset)
    pub sessions_dir: Option<PathBuf>,

    /// tmux config re-sourced by `sess reload`
    pub tmux_config: Option<PathBuf>,

    /// Timeout for non-interactive tmux commands in milliseconds
    pub command_timeout_ms: u64,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (if set, logs to file instead of stderr)
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: None,
            sessions_dir: None,
            tmux_config: None,
            command_timeout_ms: 5_000,
            debug: false,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load configuration using a specific config file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let settings: Settings = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer config file if it exists
            .merge(Toml::file(config_path))
            // Layer environment variables (SESS_PLATFORM, SESS_DEBUG, etc.)
            .merge(Env::prefixed("SESS_"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(settings)
    }

    /// `$XDG_CONFIG_HOME/sess`, or `~/.config/sess`
    pub fn config_dir() -> Result<PathBuf> {
        let xdg = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Ok(config_dir_in(xdg, &home_dir()?))
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory searched for `sessions-<platform>.yml`
    pub fn sessions_dir(&self) -> Result<PathBuf> {
        match self.sessions_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Self::config_dir(),
        }
    }

    /// tmux config path, defaulting to `~/.config/tmux/tmux.conf`
    pub fn tmux_config(&self) -> Result<PathBuf> {
        match self.tmux_config {
            Some(ref path) => Ok(path.clone()),
            None => Ok(home_dir()?.join(".config").join("tmux").join("tmux.conf")),
        }
    }

    /// Configured platform tag, or the detected one
    pub fn platform(&self) -> String {
        self.platform
            .clone()
            .filter(|platform| !platform.is_empty())
            .unwrap_or_else(detect_platform)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Save current configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }
}

/// The current user's home directory
pub fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
}

fn config_dir_in(xdg_config_home: Option<PathBuf>, home: &Path) -> PathBuf {
    match xdg_config_home {
        Some(xdg) => xdg.join("sess"),
        None => home.join(".config").join("sess"),
    }
}

/// `macos`, `wsl`, or the OS name
pub fn detect_platform() -> String {
    let wsl_distro = std::env::var("WSL_DISTRO_NAME").ok();
    platform_tag(std::env::consts::OS, wsl_distro.as_deref())
}

fn platform_tag(os: &str, wsl_distro: Option<&str>) -> String {
    if os == "macos" {
        return "macos".to_string();
    }
    match wsl_distro {
        Some(distro) if !distro.is_empty() => "wsl".to_string(),
        _ => os.to_string(),
    }
}
