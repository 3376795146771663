//! Error types for sess
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for sess
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Tmux error: {0}")]
    Tmux(#[from] TmuxError),

    #[error("Tmuxinator error: {0}")]
    Launcher(#[from] LauncherError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The side-effecting step that failed while resolving a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Check,
    Inspect,
    SwitchTo,
    Create,
    Start,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Check => write!(f, "check"),
            Self::Inspect => write!(f, "inspect"),
            Self::SwitchTo => write!(f, "switch to"),
            Self::Create => write!(f, "create"),
            Self::Start => write!(f, "start"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Session resolution errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session '{0}' not found")]
    NotFound(String),

    #[error("Failed to {action} session '{name}': {source}")]
    OperationFailed {
        action: Action,
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl SessionError {
    /// Wrap a port failure with the operation and session it belongs to
    pub fn failed(action: Action, name: impl Into<String>, source: Error) -> Self {
        Self::OperationFailed {
            action,
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// Tmux integration errors
#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("Tmux is not installed or not in PATH")]
    NotInstalled,

    #[error("Tmux command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Session '{0}' does not exist")]
    SessionNotFound(String),

    #[error("Not in a tmux session")]
    NotInsideTmux,

    #[error("No active tmux sessions")]
    NoLiveSessions,

    #[error("Tmux command timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Tmuxinator (project launcher) errors
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Tmuxinator is not installed or not in PATH")]
    NotInstalled,

    #[error("Tmuxinator command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to parse {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when this is the "no source knows the name" error from `go`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Session(SessionError::NotFound(_)))
    }
}
