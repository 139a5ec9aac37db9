//! Per-frame snapshots of host state.
//!
//! Snapshots are plain values copied out of the host at the start of a draw.
//! They have no identity and are dropped when the frame ends.

use sidehud_common::ActorHandle;
use tracing::trace;

use crate::host::{Addon, GameGui, HostServices, TargetSlot};

/// Minimum node count of a fully built player cast bar widget.
pub const MIN_CAST_BAR_NODES: usize = 12;

/// Node id of the "Interrupted" text inside a cast bar widget.
pub const INTERRUPTED_TEXT_NODE_ID: u32 = 2;

/// A current/max pair such as HP or MP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gauge {
    /// Current value.
    pub current: u32,
    /// Maximum value.
    pub max: u32,
}

impl Gauge {
    /// Creates a gauge.
    #[must_use]
    pub const fn new(current: u32, max: u32) -> Self {
        Self { current, max }
    }

    /// Fill fraction in `[0, 1]`; an empty maximum yields 0.
    #[must_use]
    pub fn fraction(self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    /// Whether the gauge has a maximum at all.
    #[must_use]
    pub const fn is_present(self) -> bool {
        self.max > 0
    }
}

/// Resource gauges of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorResources {
    /// Hit points.
    pub hp: Gauge,
    /// Mana.
    pub mp: Gauge,
    /// Crafting points (crafters only).
    pub cp: Gauge,
    /// Gathering points (gatherers only).
    pub gp: Gauge,
}

/// Resources and shield of the local player for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActorSnapshot {
    /// Resource gauges.
    pub resources: ActorResources,
    /// Shield as a fraction of max HP.
    pub shield_fraction: f32,
}

impl ActorSnapshot {
    /// Reads the snapshot of an actor, or `None` when the host has no data
    /// for it this frame.
    #[must_use]
    pub fn read(host: &HostServices<'_>, actor: ActorHandle) -> Option<Self> {
        if !actor.is_valid() {
            return None;
        }
        let resources = host.client.resources(actor)?;
        let shield = host.client.shield_fraction(actor);
        Some(Self {
            resources,
            shield_fraction: if shield.is_finite() {
                shield.clamp(0.0, 1.0)
            } else {
                0.0
            },
        })
    }
}

/// Visibility of one node inside a host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetNode {
    /// Host node id.
    pub id: u32,
    /// Whether the node is drawn.
    pub visible: bool,
}

impl WidgetNode {
    /// Creates a node.
    #[must_use]
    pub const fn new(id: u32, visible: bool) -> Self {
        Self { id, visible }
    }
}

/// Raw cast bar widget state as read from the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastBarReading {
    /// Whether the widget itself is visible.
    pub visible: bool,
    /// Node list of the widget.
    pub nodes: Vec<WidgetNode>,
    /// Progress in percent, `0..=100`.
    pub cast_percent: f32,
    /// Total cast duration in centiseconds.
    pub cast_time: f32,
    /// Name of the action being cast.
    pub cast_name: String,
    /// Whether the cast can be interrupted.
    pub interruptible: bool,
}

impl CastBarReading {
    fn interrupted_text_visible(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| node.id == INTERRUPTED_TEXT_NODE_ID && node.visible)
    }
}

/// A cast in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct CastSnapshot {
    /// Progress in percent, `0..=100`.
    pub cast_percent: f32,
    /// Total cast duration in centiseconds.
    pub cast_time: f32,
    /// Name of the action being cast.
    pub cast_name: String,
    /// Whether the cast was interrupted.
    pub interrupted: bool,
    /// Whether the cast can be interrupted.
    pub interruptible: bool,
}

impl CastSnapshot {
    /// Interprets a cast bar reading. Returns `None` when the widget is hidden
    /// or has fewer than `min_nodes` nodes loaded.
    #[must_use]
    pub fn from_reading(reading: CastBarReading, min_nodes: usize) -> Option<Self> {
        if !reading.visible || reading.nodes.len() < min_nodes {
            return None;
        }

        let interrupted = reading.interrupted_text_visible();
        Some(Self {
            cast_percent: reading.cast_percent,
            cast_time: reading.cast_time,
            cast_name: reading.cast_name,
            interrupted,
            interruptible: reading.interruptible,
        })
    }

    /// Reads the local player's cast.
    #[must_use]
    pub fn read_player(gui: &dyn GameGui) -> Option<Self> {
        let reading = gui.cast_bar(Addon::CastBar)?;
        Self::from_reading(reading, MIN_CAST_BAR_NODES)
    }

    /// Reads a target's cast.
    #[must_use]
    pub fn read_target(gui: &dyn GameGui, slot: TargetSlot) -> Option<Self> {
        let reading = gui.cast_bar(slot.cast_addon())?;
        Self::from_reading(reading, 1)
    }
}

/// Kind of a targeted unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Another player.
    Player,
    /// An NPC that can be attacked.
    HostileNpc,
    /// An NPC that cannot be attacked.
    FriendlyNpc,
    /// Anything else: objects, mounts, event NPCs.
    Other,
}

impl UnitKind {
    /// Whether the HUD shows a panel for this kind of unit.
    #[must_use]
    pub const fn has_panel(self) -> bool {
        matches!(self, Self::Player | Self::HostileNpc)
    }
}

/// A targeted unit as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetUnit {
    /// Display name.
    pub name: String,
    /// Unit kind.
    pub kind: UnitKind,
    /// Hit points.
    pub hp: Gauge,
}

/// Target or focus target state for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSnapshot {
    /// Which target this is.
    pub slot: TargetSlot,
    /// Display name.
    pub name: String,
    /// Hit points.
    pub hp: Gauge,
    /// Cast in progress, if the target's cast widget shows one.
    pub cast: Option<CastSnapshot>,
}

impl TargetSnapshot {
    /// Reads a target. Returns `None` when the slot is empty or holds a unit
    /// that gets no panel.
    #[must_use]
    pub fn read(host: &HostServices<'_>, slot: TargetSlot) -> Option<Self> {
        let unit = host.targets.target(slot)?;
        if !unit.kind.has_panel() {
            trace!(?slot, kind = ?unit.kind, "target has no panel");
            return None;
        }

        Some(Self {
            slot,
            name: unit.name,
            hp: unit.hp,
            cast: CastSnapshot::read_target(host.gui, slot),
        })
    }
}
