//! Async tmux command executor
//!
//! Provides tmux command execution with:
//! - Timeout handling for captured (non-interactive) commands
//! - Terminal passthrough for commands that attach a client
//! - Structured parsing of `list-sessions` output

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result, TmuxError};
use crate::session::{Multiplexer, SessionRecord};

/// Default command timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// `list-sessions` format: name, window count, creation epoch
const LIST_FORMAT: &str = "#{session_name}:#{session_windows}:#{session_created}";

/// Async tmux command executor
///
/// Whether we run inside tmux is captured once at construction so that
/// every decision made during one invocation sees the same answer.
#[derive(Debug, Clone)]
pub struct TmuxExecutor {
    /// Command timeout for captured commands
    timeout: Duration,
    /// True when launched from inside a tmux client
    inside_tmux: bool,
    /// tmux config file re-sourced by `reload_configuration`
    config_path: PathBuf,
}

impl TmuxExecutor {
    /// Create a new executor with default settings
    pub fn new(inside_tmux: bool, config_path: impl Into<PathBuf>) -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            inside_tmux,
            config_path: config_path.into(),
        }
    }

    /// Create an executor, detecting tmux through the `TMUX` variable
    pub fn from_env(config_path: impl Into<PathBuf>) -> Self {
        let inside_tmux = std::env::var_os("TMUX").is_some_and(|value| !value.is_empty());
        Self::new(inside_tmux, config_path)
    }

    /// Set the command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path re-sourced on reload
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Check if tmux is installed and accessible
    pub async fn check_installed(&self) -> Result<()> {
        let output = Command::new("tmux")
            .arg("-V")
            .output()
            .await
            .map_err(|_| TmuxError::NotInstalled)?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("tmux version: {}", version.trim());
            Ok(())
        } else {
            Err(TmuxError::NotInstalled.into())
        }
    }

    /// Execute a tmux command and return its output
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn execute(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("tmux");
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let result = timeout(self.timeout, cmd.output()).await;

        match result {
            Ok(Ok(output)) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    Err(TmuxError::CommandFailed {
                        command: format!("tmux {}", args.join(" ")),
                        stderr,
                    }
                    .into())
                }
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TmuxError::NotInstalled.into())
            }
            Ok(Err(e)) => {
                warn!("tmux command failed: {}", e);
                Err(TmuxError::CommandFailed {
                    command: format!("tmux {}", args.join(" ")),
                    stderr: e.to_string(),
                }
                .into())
            }
            Err(_) => Err(TmuxError::Timeout(self.timeout).into()),
        }
    }

    /// Execute a tmux command wired to this terminal, waiting for it to exit
    ///
    /// Used for commands that attach a client; no timeout applies.
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn execute_interactive(&self, args: &[&str]) -> Result<()> {
        let status = Command::new("tmux")
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TmuxError::NotInstalled,
                _ => TmuxError::CommandFailed {
                    command: format!("tmux {}", args.join(" ")),
                    stderr: e.to_string(),
                },
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(TmuxError::CommandFailed {
                command: format!("tmux {}", args.join(" ")),
                stderr: format!("exited with {status}"),
            }
            .into())
        }
    }
}

/// Exact-match target, so `-t api` can never pick `api-v2`
pub fn exact_target(session_name: &str) -> String {
    format!("={session_name}")
}

/// Parse one `name:windows:created` line of `list-sessions` output
///
/// Fields are split from the right. An unparsable window count becomes 0
/// and an unparsable timestamp is dropped.
pub fn parse_session_line(line: &str) -> Option<SessionRecord> {
    let line = line.trim_end();
    let mut parts = line.rsplitn(3, ':');
    let created = parts.next()?;
    let windows = parts.next()?;
    let name = parts.next().filter(|name| !name.is_empty())?;

    let record = SessionRecord::live(name, windows.trim().parse().unwrap_or(0));
    let created_at = created
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    Some(match created_at {
        Some(created_at) => record.with_created_at(created_at),
        None => record,
    })
}

#[async_trait]
impl Multiplexer for TmuxExecutor {
    async fn list_live_sessions(&self) -> Result<Vec<SessionRecord>> {
        match self.execute(&["list-sessions", "-F", LIST_FORMAT]).await {
            Ok(output) => Ok(output.lines().filter_map(parse_session_line).collect()),
            Err(Error::Tmux(TmuxError::CommandFailed { stderr, .. })) => {
                // No server running means no sessions
                debug!("list-sessions failed, treating as empty: {}", stderr);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn live_session_exists(&self, name: &str) -> Result<bool> {
        let target = exact_target(name);
        match self.execute(&["has-session", "-t", &target]).await {
            Ok(_) => Ok(true),
            // "has-session" returns non-zero if session doesn't exist
            Err(Error::Tmux(TmuxError::CommandFailed { .. })) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_live_session(&self, record: &SessionRecord) -> Result<()> {
        let directory = record
            .working_directory
            .as_ref()
            .map(|dir| dir.to_string_lossy().into_owned());

        let mut args = vec!["new-session"];
        if self.inside_tmux {
            args.push("-d");
        }
        args.extend(["-s", record.name.as_str()]);
        if let Some(dir) = directory.as_deref() {
            args.extend(["-c", dir]);
        }

        if self.inside_tmux {
            // Create detached, then move this client over
            self.execute(&args).await?;
            info!("Created tmux session {}", record.name);
            self.switch_to(&record.name, true).await
        } else {
            self.execute_interactive(&args).await
        }
    }

    async fn switch_to(&self, name: &str, inside_session: bool) -> Result<()> {
        if inside_session {
            let target = exact_target(name);
            self.execute(&["switch-client", "-t", &target]).await?;
            Ok(())
        } else {
            self.attach_to(name).await
        }
    }

    async fn attach_to(&self, name: &str) -> Result<()> {
        let target = exact_target(name);
        self.execute_interactive(&["attach-session", "-t", &target])
            .await
    }

    fn is_inside_session(&self) -> bool {
        self.inside_tmux
    }

    async fn switch_to_previous(&self) -> Result<()> {
        if !self.inside_tmux {
            return Err(TmuxError::NotInsideTmux.into());
        }
        self.execute(&["switch-client", "-l"]).await?;
        Ok(())
    }

    async fn delete_live_session(&self, name: &str) -> Result<()> {
        if !self.live_session_exists(name).await? {
            return Err(TmuxError::SessionNotFound(name.to_string()).into());
        }
        let target = exact_target(name);
        self.execute(&["kill-session", "-t", &target]).await?;
        Ok(())
    }

    async fn reload_configuration(&self) -> Result<Vec<String>> {
        let sessions = self.list_live_sessions().await?;
        if sessions.is_empty() {
            return Err(TmuxError::NoLiveSessions.into());
        }

        let config_path = self.config_path.to_string_lossy().into_owned();
        let mut reloaded = Vec::with_capacity(sessions.len());
        for session in sessions {
            let target = exact_target(&session.name);
            self.execute(&["source-file", "-t", &target, &config_path])
                .await?;
            info!("Reloaded tmux config in {}", session.name);
            reloaded.push(session.name);
        }

        Ok(reloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_executor_creation() {
        let executor = TmuxExecutor::new(true, "/tmp/tmux.conf");
        assert_eq!(executor.timeout, DEFAULT_TIMEOUT);
        assert!(executor.is_inside_session());
        assert_eq!(executor.config_path(), Path::new("/tmp/tmux.conf"));
    }

    #[test]
    fn test_executor_with_custom_settings() {
        let executor =
            TmuxExecutor::new(false, "/tmp/tmux.conf").with_timeout(Duration::from_secs(10));

        assert_eq!(executor.timeout, Duration::from_secs(10));
        assert!(!executor.is_inside_session());
    }

    #[test]
    fn test_exact_target() {
        assert_eq!(exact_target("api"), "=api");
    }

    #[test]
    fn test_parse_session_line() {
        let record = parse_session_line("dotfiles:3:1700000000").unwrap();
        assert_eq!(record.name, "dotfiles");
        assert_eq!(record.kind, SessionKind::Live);
        assert_eq!(record.window_count, 3);
        assert!(record.is_active);
        assert_eq!(record.created_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_session_line_splits_from_the_right() {
        let record = parse_session_line("odd:name:2:1700000000").unwrap();
        assert_eq!(record.name, "odd:name");
        assert_eq!(record.window_count, 2);
    }

    #[test]
    fn test_parse_session_line_tolerates_bad_fields() {
        let record = parse_session_line("api:x:never").unwrap();
        assert_eq!(record.window_count, 0);
        assert!(record.created_at.is_none());

        assert!(parse_session_line("").is_none());
        assert!(parse_session_line("no-separators").is_none());
        assert!(parse_session_line(":1:1700000000").is_none());
    }

    #[tokio::test]
    async fn test_switch_to_previous_requires_tmux() {
        let executor = TmuxExecutor::new(false, "/tmp/tmux.conf");
        let err = executor.switch_to_previous().await.unwrap_err();
        assert!(matches!(err, Error::Tmux(TmuxError::NotInsideTmux)));
    }

    // Tests that drive a real tmux server live in tests/integration_test.rs
}
