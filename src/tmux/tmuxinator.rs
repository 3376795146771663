//! Tmuxinator project launcher
//!
//! Lists and starts tmuxinator projects. Starting from inside tmux runs the
//! project detached and then switches the current client to it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{LauncherError, Result};
use crate::session::{Multiplexer, ProjectLauncher};

use super::TmuxExecutor;

/// Tmuxinator client
#[derive(Debug, Clone)]
pub struct Tmuxinator {
    /// Resolved `tmuxinator` executable, `None` when not installed
    program: Option<PathBuf>,
    /// Used to switch to a project started detached
    tmux: TmuxExecutor,
}

impl Tmuxinator {
    /// Locate `tmuxinator` on `PATH`
    pub fn new(tmux: TmuxExecutor) -> Self {
        Self::with_program(which::which("tmuxinator").ok(), tmux)
    }

    /// Use an explicit executable (or none)
    pub fn with_program(program: Option<PathBuf>, tmux: TmuxExecutor) -> Self {
        Self { program, tmux }
    }

    fn program(&self) -> Result<&Path> {
        self.program
            .as_deref()
            .ok_or_else(|| LauncherError::NotInstalled.into())
    }

    /// Run tmuxinator and capture its stdout
    #[instrument(skip(self))]
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(self.program()?)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| command_failed(args, e.to_string()))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(command_failed(args, stderr).into())
        }
    }

    /// Run tmuxinator attached to this terminal
    #[instrument(skip(self))]
    async fn run_interactive(&self, args: &[&str]) -> Result<()> {
        let status = Command::new(self.program()?)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| command_failed(args, e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(command_failed(args, format!("exited with {status}")).into())
        }
    }
}

fn command_failed(args: &[&str], stderr: String) -> LauncherError {
    LauncherError::CommandFailed {
        command: format!("tmuxinator {}", args.join(" ")),
        stderr,
    }
}

/// Parse `tmuxinator list` output
///
/// The first line is a header; project names follow, whitespace separated,
/// possibly over several lines. Anything shorter than two lines has no projects.
pub fn parse_project_list(output: &str) -> Vec<String> {
    let lines: Vec<&str> = output.trim().lines().collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    lines[1..]
        .iter()
        .flat_map(|line| line.split_whitespace())
        .map(String::from)
        .collect()
}

#[async_trait]
impl ProjectLauncher for Tmuxinator {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    async fn list_projects(&self) -> Result<Vec<String>> {
        let output = self.run(&["list"]).await?;
        let projects = parse_project_list(&output);
        debug!("Found {} tmuxinator projects", projects.len());
        Ok(projects)
    }

    async fn start_project(&self, name: &str, inside_session: bool) -> Result<()> {
        if inside_session {
            self.run(&["start", name, "--no-attach"]).await?;
            // The project's session carries the project name
            self.tmux.switch_to(name, true).await
        } else {
            self.run_interactive(&["start", name]).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn tmux() -> TmuxExecutor {
        TmuxExecutor::new(false, "/tmp/tmux.conf")
    }

    #[test]
    fn test_parse_project_list() {
        let output = "tmuxinator projects:\nblog   dotfiles\nwork\n";
        assert_eq!(parse_project_list(output), vec!["blog", "dotfiles", "work"]);
    }

    #[test]
    fn test_parse_project_list_malformed() {
        assert!(parse_project_list("").is_empty());
        assert!(parse_project_list("   \n").is_empty());
        assert!(parse_project_list("tmuxinator projects:").is_empty());
        assert!(parse_project_list("tmuxinator projects:\n\n").is_empty());
    }

    #[test]
    fn test_unavailable_without_program() {
        let launcher = Tmuxinator::with_program(None, tmux());
        assert!(!launcher.is_available());
    }

    #[tokio::test]
    async fn test_list_projects_without_program_fails() {
        let launcher = Tmuxinator::with_program(None, tmux());
        let err = launcher.list_projects().await.unwrap_err();
        assert!(matches!(err, Error::Launcher(LauncherError::NotInstalled)));
    }

    #[test]
    fn test_new_resolves_installed_program() {
        let launcher = Tmuxinator::new(tmux());
        assert_eq!(launcher.is_available(), which::which("tmuxinator").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_lookup_skips_non_executable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let stray = temp_dir.path().join("tmuxinator");
        std::fs::write(&stray, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&stray, std::fs::Permissions::from_mode(0o644)).unwrap();

        let found = which::which_in("tmuxinator", Some(temp_dir.path()), temp_dir.path());
        assert!(found.is_err(), "non-executable file must not count as installed");

        std::fs::set_permissions(&stray, std::fs::Permissions::from_mode(0o755)).unwrap();
        let found = which::which_in("tmuxinator", Some(temp_dir.path()), temp_dir.path());
        assert!(found.is_ok());
    }
}
