//! Session resolver - precedence-ordered lookup across all sources
//!
//! Every name is resolved by walking the same tiers in order:
//! live tmux session → tmuxinator project → declared default → brand new
//! session. The walk only moves forward; the first tier that claims the
//! name wins.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::error::{Action, Result, SessionError};
use crate::session::{
    DefaultsSource, Multiplexer, ProjectLauncher, SessionConfigEntry, SessionRecord,
};

/// Info line for a name that only tmuxinator knows
pub const LAUNCHER_PROJECT_INFO: &str = "tmuxinator project";

/// Info line for a name no source knows
pub const NEW_SESSION_INFO: &str = "new session";

/// One step of the precedence walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Live,
    Launcher,
    Default,
    Unconfigured,
}

impl Tier {
    /// The tier probed after this one on a miss
    pub fn next(self) -> Option<Tier> {
        match self {
            Self::Live => Some(Self::Launcher),
            Self::Launcher => Some(Self::Default),
            Self::Default => Some(Self::Unconfigured),
            Self::Unconfigured => None,
        }
    }
}

/// Which source claimed a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Live,
    LauncherProject,
    Default(SessionConfigEntry),
    Unconfigured,
}

/// Resolves session names against tmux, tmuxinator and the defaults file
pub struct Resolver<M, L, D> {
    multiplexer: M,
    launcher: L,
    defaults: D,
    platform: String,
}

impl<M, L, D> Resolver<M, L, D>
where
    M: Multiplexer,
    L: ProjectLauncher,
    D: DefaultsSource,
{
    /// Create a resolver over the given sources for one platform tag
    pub fn new(multiplexer: M, launcher: L, defaults: D, platform: impl Into<String>) -> Self {
        Self {
            multiplexer,
            launcher,
            defaults,
            platform: platform.into(),
        }
    }

    /// Platform tag used to select the defaults file
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The multiplexer, for operations outside name resolution (e.g. reload)
    pub fn multiplexer(&self) -> &M {
        &self.multiplexer
    }

    /// The defaults source
    pub fn defaults(&self) -> &D {
        &self.defaults
    }

    /// All sessions from every source, one record per name, sorted by name
    ///
    /// A source that fails contributes nothing; listing itself never fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<SessionRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        match self.multiplexer.list_live_sessions().await {
            Ok(live) => {
                for record in live {
                    if seen.insert(record.name.clone()) {
                        records.push(record);
                    }
                }
            }
            Err(e) => warn!("Failed to list tmux sessions: {}", e),
        }

        if self.launcher.is_available() {
            match self.launcher.list_projects().await {
                Ok(projects) => {
                    for project in projects {
                        if seen.insert(project.clone()) {
                            records.push(SessionRecord::launcher_project(project));
                        }
                    }
                }
                Err(e) => warn!("Failed to list tmuxinator projects: {}", e),
            }
        }

        match self.defaults.load_defaults(&self.platform).await {
            Ok(entries) => {
                for entry in entries {
                    if seen.insert(entry.name.clone()) {
                        records.push(SessionRecord::from_default(entry));
                    }
                }
            }
            Err(e) => warn!("Failed to load default sessions: {}", e),
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Listed {} sessions", records.len());
        records
    }

    /// Switch to `name` if it exists anywhere, otherwise create it
    #[instrument(skip(self))]
    pub async fn create_or_switch(&self, name: &str) -> Result<()> {
        let resolution = self.resolve(name).await?;
        self.materialize(name, resolution).await
    }

    /// Whether any source knows `name`; only the live check may fail
    #[instrument(skip(self))]
    pub async fn session_exists(&self, name: &str) -> Result<bool> {
        Ok(self.resolve(name).await? != Resolution::Unconfigured)
    }

    /// Like `create_or_switch`, but refuses to create an unknown session
    #[instrument(skip(self))]
    pub async fn go_to_session(&self, name: &str) -> Result<()> {
        match self.resolve(name).await? {
            Resolution::Unconfigured => Err(SessionError::NotFound(name.to_string()).into()),
            resolution => self.materialize(name, resolution).await,
        }
    }

    /// Kill a live session
    #[instrument(skip(self))]
    pub async fn delete_session(&self, name: &str) -> Result<()> {
        self.multiplexer
            .delete_live_session(name)
            .await
            .map_err(|e| SessionError::failed(Action::Delete, name, e))?;
        info!("Deleted session {}", name);
        Ok(())
    }

    /// Switch back to the previously active live session
    pub async fn switch_to_previous(&self) -> Result<()> {
        self.multiplexer.switch_to_previous().await
    }

    /// Short human-readable status for `name`
    #[instrument(skip(self))]
    pub async fn get_session_info(&self, name: &str) -> Result<String> {
        let live = self
            .multiplexer
            .list_live_sessions()
            .await
            .map_err(|e| SessionError::failed(Action::Inspect, name, e))?;
        if let Some(record) = live.iter().find(|record| record.name == name) {
            return Ok(record.display_info());
        }

        // Starting past the live tier, the walk can never report `Live`.
        let info = match self.resolve_from(name, Tier::Launcher).await? {
            Resolution::LauncherProject => LAUNCHER_PROJECT_INFO.to_string(),
            Resolution::Default(entry) => entry.info(),
            Resolution::Live | Resolution::Unconfigured => NEW_SESSION_INFO.to_string(),
        };
        Ok(info)
    }

    /// Walk every tier for `name`
    pub async fn resolve(&self, name: &str) -> Result<Resolution> {
        self.resolve_from(name, Tier::Live).await
    }

    async fn resolve_from(&self, name: &str, start: Tier) -> Result<Resolution> {
        let mut tier = start;
        loop {
            if let Some(resolution) = self.probe(tier, name).await? {
                debug!("Resolved '{}' at tier {:?}", name, tier);
                return Ok(resolution);
            }
            match tier.next() {
                Some(next) => tier = next,
                None => return Ok(Resolution::Unconfigured),
            }
        }
    }

    /// Check a single tier. Only the live check is authoritative enough to fail.
    async fn probe(&self, tier: Tier, name: &str) -> Result<Option<Resolution>> {
        match tier {
            Tier::Live => {
                let exists = self
                    .multiplexer
                    .live_session_exists(name)
                    .await
                    .map_err(|e| SessionError::failed(Action::Check, name, e))?;
                Ok(exists.then_some(Resolution::Live))
            }
            Tier::Launcher => {
                if !self.launcher.is_available() {
                    return Ok(None);
                }
                match self.launcher.project_exists(name).await {
                    Ok(true) => Ok(Some(Resolution::LauncherProject)),
                    Ok(false) => Ok(None),
                    Err(e) => {
                        warn!("Tmuxinator lookup for '{}' failed: {}", name, e);
                        Ok(None)
                    }
                }
            }
            Tier::Default => match self.defaults.get_entry(name, &self.platform).await {
                Ok(entry) => Ok(entry.map(Resolution::Default)),
                Err(e) => {
                    warn!("Default session lookup for '{}' failed: {}", name, e);
                    Ok(None)
                }
            },
            Tier::Unconfigured => Ok(Some(Resolution::Unconfigured)),
        }
    }

    async fn materialize(&self, name: &str, resolution: Resolution) -> Result<()> {
        let inside = self.multiplexer.is_inside_session();
        match resolution {
            Resolution::Live => {
                self.multiplexer
                    .switch_to(name, inside)
                    .await
                    .map_err(|e| SessionError::failed(Action::SwitchTo, name, e))?;
                Ok(())
            }
            Resolution::LauncherProject => self.start_project(name, inside).await,
            Resolution::Default(entry) => self.materialize_default(entry, inside).await,
            Resolution::Unconfigured => {
                self.create(SessionRecord::new_live(name, None)).await
            }
        }
    }

    async fn materialize_default(&self, entry: SessionConfigEntry, inside: bool) -> Result<()> {
        let project = entry
            .launcher_project_ref
            .as_deref()
            .filter(|project| !project.is_empty());

        match project {
            Some(project) if self.launcher.is_available() => {
                self.start_project(project, inside).await
            }
            Some(project) => {
                warn!(
                    "Tmuxinator unavailable, creating plain session '{}' instead of project '{}'",
                    entry.name, project
                );
                self.create(SessionRecord::new_live(entry.name, entry.directory))
                    .await
            }
            None => {
                self.create(SessionRecord::new_live(entry.name, entry.directory))
                    .await
            }
        }
    }

    async fn start_project(&self, project: &str, inside: bool) -> Result<()> {
        info!("Starting tmuxinator project {}", project);
        self.launcher
            .start_project(project, inside)
            .await
            .map_err(|e| SessionError::failed(Action::Start, project, e))?;
        Ok(())
    }

    async fn create(&self, record: SessionRecord) -> Result<()> {
        info!(
            "Creating session {} in {:?}",
            record.name, record.working_directory
        );
        self.multiplexer
            .create_live_session(&record)
            .await
            .map_err(|e| SessionError::failed(Action::Create, record.name.as_str(), e))?;
        Ok(())
    }
}
