//! Configuration module
//!
//! Handles:
//! - Application settings (`~/.config/sess/config.toml`)
//! - Declared default sessions (`~/.config/sess/sessions-<platform>.yml`)

mod defaults;
mod settings;

pub use defaults::*;
pub use settings::*;
