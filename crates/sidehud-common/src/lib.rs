//! # Side HUD Common
//!
//! Common types shared by every Side HUD crate:
//! - Error types
//! - Schema version for the persisted configuration record
//! - RGB / RGBA color values
//! - Opaque host handles

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
