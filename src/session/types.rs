//! Core session types
//!
//! Defines the flat session model shared by every source:
//! - `SessionRecord` describes a session regardless of where it came from
//! - `SessionConfigEntry` is a declared default from the YAML file

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of a session record, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Running in tmux right now
    Live,
    /// Known to tmuxinator, not running
    LauncherProject,
    /// Declared in the defaults file, not running
    Default,
}

impl SessionKind {
    /// Visual indicator used in listings
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Live => "●",
            Self::LauncherProject => "⚙",
            Self::Default => "○",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "tmux"),
            Self::LauncherProject => write!(f, "tmuxinator"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A session from any of the three sources
///
/// Built fresh on every list/resolve call. Use the constructors so that
/// `is_active` always agrees with `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session name, the merge key across sources
    pub name: String,
    /// Where the record came from
    pub kind: SessionKind,
    /// Number of windows (live sessions only)
    pub window_count: usize,
    /// Starting directory (new live sessions and defaults)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
    /// Human-readable description (defaults only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tmuxinator project to start instead of a plain session (defaults only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher_project_ref: Option<String>,
    /// True iff the session is live
    pub is_active: bool,
    /// When tmux created the session, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// A session currently running in tmux
    pub fn live(name: impl Into<String>, window_count: usize) -> Self {
        Self {
            name: name.into(),
            kind: SessionKind::Live,
            window_count,
            working_directory: None,
            description: None,
            launcher_project_ref: None,
            is_active: true,
            created_at: None,
        }
    }

    /// A tmuxinator project that is not running
    pub fn launcher_project(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SessionKind::LauncherProject,
            window_count: 0,
            working_directory: None,
            description: None,
            launcher_project_ref: None,
            is_active: false,
            created_at: None,
        }
    }

    /// A declared default that is not running
    pub fn from_default(entry: SessionConfigEntry) -> Self {
        Self {
            name: entry.name,
            kind: SessionKind::Default,
            window_count: 0,
            working_directory: entry.directory,
            description: entry.description,
            launcher_project_ref: entry.launcher_project_ref,
            is_active: false,
            created_at: None,
        }
    }

    /// A request for a brand new live session, optionally in a directory
    pub fn new_live(name: impl Into<String>, working_directory: Option<PathBuf>) -> Self {
        Self {
            working_directory,
            ..Self::live(name, 0)
        }
    }

    /// Set the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Visual indicator for the session kind
    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    /// Formatted line for listings, e.g. `api (2 windows)`
    pub fn display_info(&self) -> String {
        match self.kind {
            SessionKind::Live => format!("{} ({})", self.name, format_window_count(self.window_count)),
            SessionKind::LauncherProject => format!("{} (tmuxinator)", self.name),
            SessionKind::Default => format!("{} (not started)", self.name),
        }
    }
}

/// A default session declared in `sessions-<platform>.yml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfigEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default, rename = "tmuxinator_project")]
    pub launcher_project_ref: Option<String>,
}

impl SessionConfigEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_launcher_project(mut self, project: impl Into<String>) -> Self {
        self.launcher_project_ref = Some(project.into());
        self
    }

    /// Status line shown by `sess info`
    pub fn info(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => format!("default: {description}"),
            _ => "default (not started)".to_string(),
        }
    }
}

/// `1 window` / `N windows`
pub fn format_window_count(count: usize) -> String {
    if count == 1 {
        "1 window".to_string()
    } else {
        format!("{count} windows")
    }
}

/// Render records one per line as `<icon> <display_info>`
pub fn render_listing(records: &[SessionRecord]) -> String {
    records
        .iter()
        .map(|record| format!("{} {}", record.icon(), record.display_info()))
        .collect::<Vec<_>>()
        .join("\n")
}
