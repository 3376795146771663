//! sess - a fast tmux session picker
//!
//! Unifies three sources of sessions behind one name-based
//! lookup/create/switch operation:
//! - running tmux sessions
//! - tmuxinator projects
//! - default sessions declared in `sessions-<platform>.yml`
//!
//! # Modules
//!
//! - [`session`] - Session model, capability traits and the `Resolver`
//! - [`tmux`] - tmux and tmuxinator implementations of the capabilities
//! - [`config`] - Layered settings and the YAML defaults loader
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod session;
pub mod tmux;

pub use config::{DefaultsLoader, Settings};
pub use error::{Error, Result};
pub use session::{
    DefaultsSource, Multiplexer, ProjectLauncher, Resolver, SessionConfigEntry, SessionKind,
    SessionRecord,
};
pub use tmux::{TmuxExecutor, Tmuxinator};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// The resolver wired to the real tools
pub type SystemResolver = Resolver<TmuxExecutor, Tmuxinator, DefaultsLoader>;

/// Build a resolver over tmux, tmuxinator and the defaults file from `settings`
pub fn system_resolver(settings: &Settings) -> Result<SystemResolver> {
    let tmux = TmuxExecutor::from_env(settings.tmux_config()?)
        .with_timeout(settings.command_timeout());
    let tmuxinator = Tmuxinator::new(tmux.clone());
    let defaults = DefaultsLoader::new(settings.sessions_dir()?, config::home_dir()?);

    Ok(Resolver::new(tmux, tmuxinator, defaults, settings.platform()))
}
