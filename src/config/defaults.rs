//! Default session definitions
//!
//! Reads `sessions-<platform>.yml` from the sessions directory:
//!
//! ```yaml
//! defaults:
//!   - name: dotfiles
//!     description: Dotfiles repo
//!     directory: ~/dotfiles
//!     tmuxinator_project: dots   # optional
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::session::{DefaultsSource, SessionConfigEntry};

#[derive(Debug, Default, Deserialize)]
struct DefaultsFile {
    #[serde(default)]
    defaults: Vec<SessionConfigEntry>,
}

/// Loads declared default sessions from YAML files
#[derive(Debug, Clone)]
pub struct DefaultsLoader {
    sessions_dir: PathBuf,
    home: PathBuf,
}

impl DefaultsLoader {
    /// `home` replaces a leading `~` in directories
    pub fn new(sessions_dir: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            sessions_dir: sessions_dir.into(),
            home: home.into(),
        }
    }

    /// Path of the defaults file for `platform`
    pub fn file_path(&self, platform: &str) -> PathBuf {
        self.sessions_dir.join(format!("sessions-{platform}.yml"))
    }

    /// Parse a defaults file body
    pub fn parse(&self, path: &Path, content: &str) -> Result<Vec<SessionConfigEntry>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: DefaultsFile =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(file
            .defaults
            .into_iter()
            .filter_map(|entry| self.normalize(entry))
            .collect())
    }

    fn normalize(&self, entry: SessionConfigEntry) -> Option<SessionConfigEntry> {
        if entry.name.trim().is_empty() {
            warn!("Skipping default session without a name");
            return None;
        }

        Some(SessionConfigEntry {
            name: entry.name,
            description: entry.description.filter(|d| !d.trim().is_empty()),
            directory: entry
                .directory
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(|dir| expand_home(&dir, &self.home)),
            launcher_project_ref: entry
                .launcher_project_ref
                .filter(|project| !project.trim().is_empty()),
        })
    }
}

/// Replace a leading `~` component with `home`
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[async_trait]
impl DefaultsSource for DefaultsLoader {
    async fn load_defaults(&self, platform: &str) -> Result<Vec<SessionConfigEntry>> {
        let path = self.file_path(platform);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No defaults file at {:?}", path);
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into());
            }
        };

        self.parse(&path, &content)
    }
}
