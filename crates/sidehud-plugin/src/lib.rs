//! # Side HUD Plugin
//!
//! Host-facing shell of the Side HUD overlay:
//! - Settings persistence (TOML under the user config directory)
//! - Logging setup
//! - The plugin object: command surface, style loading and per-frame drawing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod logging;
pub mod plugin;
pub mod settings_persistence;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{init as init_logging, LogFormat};
    pub use crate::plugin::*;
    pub use crate::settings_persistence::*;
}

pub use prelude::*;
