//! Error types for Side HUD.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Side HUD operations.
#[derive(Debug, Error)]
pub enum HudError {
    /// Style loading errors
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    /// Settings persistence errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Style loading errors.
///
/// Any of these aborts the load of the style being processed; styles that
/// were already installed are left untouched.
#[derive(Debug, Error)]
pub enum StyleError {
    /// One of the four required images is missing
    #[error("{} was not found", path.display())]
    MissingImage {
        /// Path of the missing image
        path: PathBuf,
    },

    /// An image exists but could not be decoded or uploaded
    #[error("Failed to load {}: {reason}", path.display())]
    LoadFailed {
        /// Path of the image
        path: PathBuf,
        /// Decoder or upload failure
        reason: String,
    },

    /// The style root directory does not exist
    #[error("{} was not found", path.display())]
    MissingDirectory {
        /// Path of the directory
        path: PathBuf,
    },

    /// No style with that name is installed
    #[error("Style not installed: {0}")]
    NotInstalled(String),
}

/// Result type alias for Side HUD operations.
pub type HudResult<T> = Result<T, HudError>;
