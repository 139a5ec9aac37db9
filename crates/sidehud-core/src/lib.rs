//! # Side HUD Core
//!
//! Host-independent state for the Side HUD overlay:
//! - The persisted configuration record
//! - Accessor traits through which host state is read
//! - Per-frame snapshots of that state
//! - Derived bar, cast and text state

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod host;
pub mod snapshot;
pub mod state;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::host::*;
    pub use crate::snapshot::*;
    pub use crate::state::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::FakeHost;

    #[test]
    fn test_player_state_from_fake_host() {
        let host = FakeHost::new();
        let services = host.services();
        let player = services.client.local_player().expect("player");
        let snapshot = ActorSnapshot::read(&services, player).expect("snapshot");
        let state = ActorState::derive(&snapshot.resources, &HudConfig::default());

        assert_eq!(state.hp.fraction, 0.5);
        assert_eq!(state.resource.kind, BarKind::Resource(ResourceKind::Mp));
        assert!((state.resource.fraction - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_player_cast_requires_full_widget() {
        let host = FakeHost::new().with_player_cast("Cure", 10.0, 150.0);
        assert!(CastSnapshot::read_player(&host).is_some());

        let mut reading = FakeHost::cast_reading("Cure", 10.0, 150.0);
        reading.nodes.truncate(3);
        let host = FakeHost::new().with_cast(Addon::CastBar, reading);
        assert!(CastSnapshot::read_player(&host).is_none());
    }
}
