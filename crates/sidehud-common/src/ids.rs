//! Opaque handles into host-owned state.

use serde::{Deserialize, Serialize};

/// Handle to an actor living in host memory.
///
/// The value is whatever the host uses to address the actor (usually its
/// object address). It carries no meaning on this side of the seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorHandle(u64);

impl ActorHandle {
    /// Creates a handle from a raw host value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw host value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid actor handle.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) handle.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor@{:#x}", self.0)
    }
}
