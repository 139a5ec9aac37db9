//! Tracing subscriber setup.
//!
//! The host may already have installed a global subscriber, so
//! initialisation never fails: a second install is simply ignored.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "sidehud=info";

/// Output format of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Builds the filter: `RUST_LOG` when set and valid, else `directive`.
#[must_use]
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Installs the default subscriber. Returns whether it was installed.
pub fn init() -> bool {
    init_with(LogFormat::Pretty, DEFAULT_FILTER)
}

/// Installs a subscriber with the given format and fallback filter.
/// Returns whether it was installed.
pub fn init_with(format: LogFormat, directive: &str) -> bool {
    let filter = env_filter(directive);
    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .try_init(),
    };
    result.is_ok()
}
