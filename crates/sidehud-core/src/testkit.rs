//! In-memory host used by tests and headless tools.
//!
//! [`FakeHost`] implements every host accessor trait from plain fields, so
//! draw calls can be driven without a game client.

use std::collections::HashMap;

use sidehud_common::ActorHandle;

use crate::host::{Addon, ClientState, GameGui, HostServices, TargetManager, TargetSlot};
use crate::snapshot::{
    ActorResources, CastBarReading, Gauge, TargetUnit, UnitKind, WidgetNode, MIN_CAST_BAR_NODES,
};

/// Handle the fake host reports for the local player.
pub const FAKE_PLAYER: ActorHandle = ActorHandle::from_raw(0x1000);

/// Scriptable host state.
#[derive(Debug, Clone)]
pub struct FakeHost {
    /// Combat flag.
    pub in_combat: bool,
    /// Local player resources; `None` means not logged in.
    pub player: Option<ActorResources>,
    /// Shield fraction of the local player.
    pub shield: f32,
    /// Widget visibility; missing entries mean the widget does not exist.
    pub addons: HashMap<Addon, bool>,
    /// Cast bar readings per widget.
    pub cast_bars: HashMap<Addon, CastBarReading>,
    /// Targets per slot.
    pub targets: HashMap<TargetSlot, TargetUnit>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// A logged-in player at 50/100 HP and 80/100 MP, out of combat, with the
    /// parameter widget shown and no fade.
    #[must_use]
    pub fn new() -> Self {
        let mut addons = HashMap::new();
        addons.insert(Addon::ParameterWidget, true);
        addons.insert(Addon::FadeMiddle, false);

        Self {
            in_combat: false,
            player: Some(ActorResources {
                hp: Gauge::new(50, 100),
                mp: Gauge::new(80, 100),
                ..Default::default()
            }),
            shield: 0.0,
            addons,
            cast_bars: HashMap::new(),
            targets: HashMap::new(),
        }
    }

    /// Borrows the host as a set of services.
    #[must_use]
    pub fn services(&self) -> HostServices<'_> {
        HostServices::new(self, self, self)
    }

    /// The local player handle, if logged in.
    #[must_use]
    pub fn player(&self) -> Option<ActorHandle> {
        self.player.map(|_| FAKE_PLAYER)
    }

    /// Replaces the player's resources.
    #[must_use]
    pub fn with_resources(mut self, resources: ActorResources) -> Self {
        self.player = Some(resources);
        self
    }

    /// Logs the player out.
    #[must_use]
    pub fn without_player(mut self) -> Self {
        self.player = None;
        self
    }

    /// Sets the shield fraction.
    #[must_use]
    pub fn with_shield(mut self, shield: f32) -> Self {
        self.shield = shield;
        self
    }

    /// Sets the combat flag.
    #[must_use]
    pub fn with_combat(mut self, in_combat: bool) -> Self {
        self.in_combat = in_combat;
        self
    }

    /// Sets a widget's visibility; `None` removes the widget.
    #[must_use]
    pub fn with_addon(mut self, addon: Addon, visible: Option<bool>) -> Self {
        match visible {
            Some(visible) => {
                self.addons.insert(addon, visible);
            },
            None => {
                self.addons.remove(&addon);
            },
        }
        self
    }

    /// Shows a cast on a widget.
    #[must_use]
    pub fn with_cast(mut self, addon: Addon, reading: CastBarReading) -> Self {
        self.cast_bars.insert(addon, reading);
        self
    }

    /// Shows a fully built player cast.
    #[must_use]
    pub fn with_player_cast(self, name: &str, percent: f32, cast_time: f32) -> Self {
        self.with_cast(Addon::CastBar, Self::cast_reading(name, percent, cast_time))
    }

    /// Puts a unit at full HP in a target slot.
    #[must_use]
    pub fn with_target(mut self, slot: TargetSlot, name: &str, kind: UnitKind) -> Self {
        self.targets.insert(
            slot,
            TargetUnit {
                name: name.to_string(),
                kind,
                hp: Gauge::new(1000, 1000),
            },
        );
        self
    }

    /// A visible cast bar reading with a full node list.
    #[must_use]
    pub fn cast_reading(name: &str, percent: f32, cast_time: f32) -> CastBarReading {
        CastBarReading {
            visible: true,
            nodes: (0..MIN_CAST_BAR_NODES as u32)
                .map(|id| WidgetNode::new(id + 3, true))
                .collect(),
            cast_percent: percent,
            cast_time,
            cast_name: name.to_string(),
            interruptible: false,
        }
    }
}

impl ClientState for FakeHost {
    fn in_combat(&self) -> bool {
        self.in_combat
    }

    fn local_player(&self) -> Option<ActorHandle> {
        self.player()
    }

    fn resources(&self, actor: ActorHandle) -> Option<ActorResources> {
        (actor == FAKE_PLAYER).then_some(self.player).flatten()
    }

    fn shield_fraction(&self, _actor: ActorHandle) -> f32 {
        self.shield
    }
}

impl GameGui for FakeHost {
    fn addon_visible(&self, addon: Addon) -> Option<bool> {
        self.addons.get(&addon).copied()
    }

    fn cast_bar(&self, addon: Addon) -> Option<CastBarReading> {
        self.cast_bars.get(&addon).cloned()
    }
}

impl TargetManager for FakeHost {
    fn target(&self, slot: TargetSlot) -> Option<TargetUnit> {
        self.targets.get(&slot).cloned()
    }
}
