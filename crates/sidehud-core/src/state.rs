//! Derived HUD state.
//!
//! Turns raw snapshots into the numbers the compositor draws: fill
//! fractions, resource selection, colors and text. Every division is guarded
//! so that degenerate host values (empty maxima, zero-length casts) produce an
//! empty bar or an absent feature instead of NaN geometry.

use sidehud_common::Rgba;

use crate::config::HudConfig;
use crate::snapshot::{ActorResources, CastSnapshot, Gauge};

/// Minus sign used in front of count-down cast timers.
pub const CAST_TIME_SIGN: char = '\u{2212}';

/// Which secondary resource the player uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Mana, for combat jobs.
    Mp,
    /// Crafting points.
    Cp,
    /// Gathering points.
    Gp,
}

impl ResourceKind {
    /// Picks the resource to display: CP when the actor has any, then GP,
    /// then MP.
    #[must_use]
    pub fn select(resources: &ActorResources) -> Self {
        if resources.cp.is_present() {
            Self::Cp
        } else if resources.gp.is_present() {
            Self::Gp
        } else {
            Self::Mp
        }
    }

    /// The gauge holding this resource.
    #[must_use]
    pub fn gauge(self, resources: &ActorResources) -> Gauge {
        match self {
            Self::Mp => resources.mp,
            Self::Cp => resources.cp,
            Self::Gp => resources.gp,
        }
    }

    /// Fill color of this resource.
    #[must_use]
    pub fn color(self, config: &HudConfig) -> Rgba {
        match self {
            Self::Mp => config.mp_color_alpha(),
            Self::Cp => config.cp_color_alpha(),
            Self::Gp => config.gp_color_alpha(),
        }
    }
}

/// What a bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    /// Hit points.
    Hp,
    /// The selected secondary resource.
    Resource(ResourceKind),
}

/// Content of one of the two main bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarContent {
    /// What the bar shows.
    pub kind: BarKind,
    /// Fill fraction in `[0, 1]`.
    pub fraction: f32,
    /// Current value, for the numeric overlay.
    pub value: u32,
    /// Fill and text color.
    pub color: Rgba,
}

/// Player resources ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorState {
    /// HP bar content.
    pub hp: BarContent,
    /// Resource bar content.
    pub resource: BarContent,
}

impl ActorState {
    /// Derives bar contents from a resource sample.
    #[must_use]
    pub fn derive(resources: &ActorResources, config: &HudConfig) -> Self {
        let kind = ResourceKind::select(resources);
        let gauge = kind.gauge(resources);

        Self {
            hp: BarContent {
                kind: BarKind::Hp,
                fraction: resources.hp.fraction(),
                value: resources.hp.current,
                color: config.hp_color_alpha(),
            },
            resource: BarContent {
                kind: BarKind::Resource(kind),
                fraction: gauge.fraction(),
                value: gauge.current,
                color: kind.color(config),
            },
        }
    }
}

/// Bar contents placed on the physical left and right bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAssignment {
    /// Content of the left bar.
    pub left: BarContent,
    /// Content of the right bar.
    pub right: BarContent,
}

impl BarAssignment {
    /// HP goes left and the resource right, unless `flip_bars` swaps them.
    #[must_use]
    pub fn new(state: &ActorState, flip_bars: bool) -> Self {
        if flip_bars {
            Self {
                left: state.resource,
                right: state.hp,
            }
        } else {
            Self {
                left: state.hp,
                right: state.resource,
            }
        }
    }
}

/// A cast ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CastState {
    /// Progress in `[0, 1]`.
    pub fraction: f32,
    /// Seconds shown next to the cast name: remaining time, or elapsed time
    /// when casts count up (negative in that case).
    pub remaining_seconds: f32,
    /// Portion of the cast covered by the slidecast window, when the cast
    /// has a usable duration.
    pub slidecast_fraction: Option<f32>,
    /// Fill color: the interrupt color once interrupted.
    pub color: Rgba,
    /// Two-line label: action name, then the timer.
    pub label: String,
}

impl CastState {
    /// Derives cast bar values from a snapshot.
    #[must_use]
    pub fn derive(cast: &CastSnapshot, config: &HudConfig) -> Self {
        let fraction = finite_or_zero(cast.cast_percent / 100.0).clamp(0.0, 1.0);
        let cast_time = finite_or_zero(cast.cast_time);

        let start = if config.cast_time_up { 0.0 } else { cast_time };
        let remaining_seconds = (start - cast_time * fraction) / 100.0;

        let slidecast_fraction = if cast_time > 0.0 {
            Some((config.slidecast_time / 10.0 / cast_time).clamp(0.0, 1.0))
        } else {
            None
        };

        let color = if cast.interrupted {
            config.cast_interrupt_color_alpha()
        } else {
            config.cast_color_alpha()
        };

        Self {
            fraction,
            remaining_seconds,
            slidecast_fraction,
            color,
            label: cast_label(&cast.cast_name, remaining_seconds, config.cast_time_up),
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn cast_label(name: &str, seconds: f32, counting_up: bool) -> String {
    let seconds = seconds.abs();
    if counting_up {
        format!("{name}\n{seconds:.2}")
    } else {
        format!("{name}\n{CAST_TIME_SIGN} {seconds:.2}")
    }
}

/// Whole percentage of a fraction, rounded half away from zero.
#[must_use]
pub fn percent(fraction: f32) -> i64 {
    (finite_or_zero(fraction) * 100.0).round() as i64
}

/// Text drawn under a bar, or `None` when both numbers and percentages are
/// turned off.
#[must_use]
pub fn gauge_text(content: &BarContent, config: &HudConfig) -> Option<String> {
    let value = content.value;
    let percent = percent(content.fraction);

    match (config.show_numbers, config.show_percentage) {
        (true, true) => Some(format!("{value}\n({percent}%)")),
        (true, false) => Some(format!("{value}")),
        (false, true) => Some(format!("({percent}%)")),
        (false, false) => None,
    }
}

/// First line of a target panel: name and HP percentage.
#[must_use]
pub fn target_header(name: &str, hp: Gauge) -> String {
    format!("{name}  {}%", percent(hp.fraction()))
}
