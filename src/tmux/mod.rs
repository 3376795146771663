//! Async tmux integration module
//!
//! Provides the real implementations of the session capabilities:
//! - `TmuxExecutor` - tmux command execution (the `Multiplexer`)
//! - `Tmuxinator` - tmuxinator projects (the `ProjectLauncher`)

mod executor;
mod tmuxinator;

pub use executor::*;
pub use tmuxinator::*;
