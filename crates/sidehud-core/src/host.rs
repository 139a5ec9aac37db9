//! Read-only accessors into host-owned state.
//!
//! The host process owns every structure the HUD reads. These traits are the
//! only seam through which that state is reached; implementations translate
//! them to whatever the host exposes (memory reads, scripting APIs, a replay
//! file). All reads happen on the frame thread and are point-in-time: nothing
//! returned here is kept past the frame that read it.

use sidehud_common::ActorHandle;

use crate::snapshot::{ActorResources, CastBarReading, TargetUnit};

/// Host UI widgets the HUD inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addon {
    /// The native HP/MP widget. The HUD only draws while it is visible.
    ParameterWidget,
    /// Full-screen fade used by cutscenes and zone changes.
    FadeMiddle,
    /// The player's cast bar.
    CastBar,
    /// The target's cast bar.
    TargetInfoCastBar,
    /// The focus target panel, including its cast bar.
    FocusTargetInfo,
}

impl Addon {
    /// Host name of the widget.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ParameterWidget => "_ParameterWidget",
            Self::FadeMiddle => "FadeMiddle",
            Self::CastBar => "_CastBar",
            Self::TargetInfoCastBar => "_TargetInfoCastBar",
            Self::FocusTargetInfo => "_FocusTargetInfo",
        }
    }
}

impl std::fmt::Display for Addon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the player's targets is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    /// Current hard target.
    Target,
    /// Focus target.
    FocusTarget,
}

impl TargetSlot {
    /// Widget holding this target's cast bar.
    #[must_use]
    pub const fn cast_addon(self) -> Addon {
        match self {
            Self::Target => Addon::TargetInfoCastBar,
            Self::FocusTarget => Addon::FocusTargetInfo,
        }
    }
}

/// Client-wide state: conditions and the local player.
pub trait ClientState {
    /// Whether the player is currently in combat.
    fn in_combat(&self) -> bool;

    /// The local player, if logged in and loaded.
    fn local_player(&self) -> Option<ActorHandle>;

    /// Current and maximum resources of an actor.
    fn resources(&self, actor: ActorHandle) -> Option<ActorResources>;

    /// Shield as a fraction of max HP, in `[0, 1]`.
    fn shield_fraction(&self, actor: ActorHandle) -> f32;
}

/// Host UI widget state.
pub trait GameGui {
    /// Visibility of a widget, or `None` when the widget does not exist.
    fn addon_visible(&self, addon: Addon) -> Option<bool>;

    /// Raw cast bar state held by a widget, or `None` when the widget does
    /// not exist.
    fn cast_bar(&self, addon: Addon) -> Option<CastBarReading>;
}

/// The player's targets.
pub trait TargetManager {
    /// The unit in the given slot, if any.
    fn target(&self, slot: TargetSlot) -> Option<TargetUnit>;
}

/// Every host accessor the compositor needs for one frame.
#[derive(Clone, Copy)]
pub struct HostServices<'a> {
    /// Client state.
    pub client: &'a dyn ClientState,
    /// UI widget state.
    pub gui: &'a dyn GameGui,
    /// Target state.
    pub targets: &'a dyn TargetManager,
}

impl std::fmt::Debug for HostServices<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("client", &"<dyn ClientState>")
            .field("gui", &"<dyn GameGui>")
            .field("targets", &"<dyn TargetManager>")
            .finish()
    }
}

impl<'a> HostServices<'a> {
    /// Bundles the three accessors.
    #[must_use]
    pub fn new(
        client: &'a dyn ClientState,
        gui: &'a dyn GameGui,
        targets: &'a dyn TargetManager,
    ) -> Self {
        Self {
            client,
            gui,
            targets,
        }
    }
}
