//! Session management module
//!
//! Provides the unified session model and its resolution:
//! - `SessionRecord` - A session from any source (live, tmuxinator, default)
//! - `Multiplexer` / `ProjectLauncher` / `DefaultsSource` - Injected capabilities
//! - `Resolver` - Precedence-ordered list, lookup and create-or-switch

mod ports;
mod resolver;
mod types;

pub use ports::*;
pub use resolver::*;
pub use types::*;
