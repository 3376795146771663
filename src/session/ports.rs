//! Capabilities the resolver needs from the outside world
//!
//! Each trait is implemented once against the real tool (`tmux`,
//! `tmuxinator`, the YAML defaults file) and by in-memory fakes in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::{SessionConfigEntry, SessionRecord};

/// A terminal multiplexer holding live sessions
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// All sessions currently running
    async fn list_live_sessions(&self) -> Result<Vec<SessionRecord>>;

    /// Whether a live session with exactly this name exists
    async fn live_session_exists(&self, name: &str) -> Result<bool>;

    /// Create a session from `record.name` and `record.working_directory`
    async fn create_live_session(&self, record: &SessionRecord) -> Result<()>;

    /// Switch the current client (`inside_session`) or attach a new one
    async fn switch_to(&self, name: &str, inside_session: bool) -> Result<()>;

    /// Attach the current terminal to a session
    async fn attach_to(&self, name: &str) -> Result<()>;

    /// Whether this process runs inside a multiplexer session
    fn is_inside_session(&self) -> bool;

    /// Switch back to the previously active session
    async fn switch_to_previous(&self) -> Result<()>;

    /// Kill a live session; fails if it is not live
    async fn delete_live_session(&self, name: &str) -> Result<()>;

    /// Re-source the multiplexer config in every live session, returning their names
    async fn reload_configuration(&self) -> Result<Vec<String>>;
}

/// A tool that starts named, declaratively configured projects
#[async_trait]
pub trait ProjectLauncher: Send + Sync {
    /// Whether the launcher can be used at all
    fn is_available(&self) -> bool;

    /// Names of all known projects
    async fn list_projects(&self) -> Result<Vec<String>>;

    /// Whether a project with exactly this name exists
    async fn project_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_projects().await?.iter().any(|project| project == name))
    }

    /// Start a project, attaching or switching depending on `inside_session`
    async fn start_project(&self, name: &str, inside_session: bool) -> Result<()>;
}

/// Declared default sessions, keyed by platform tag
///
/// Directories must already have `~` expanded.
#[async_trait]
pub trait DefaultsSource: Send + Sync {
    /// All defaults declared for `platform`
    async fn load_defaults(&self, platform: &str) -> Result<Vec<SessionConfigEntry>>;

    /// The default named `name`, if declared
    async fn get_entry(&self, name: &str, platform: &str) -> Result<Option<SessionConfigEntry>> {
        Ok(self
            .load_defaults(platform)
            .await?
            .into_iter()
            .find(|entry| entry.name == name))
    }
}
