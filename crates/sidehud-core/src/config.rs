//! HUD configuration record.
//!
//! The record is flat on purpose: every field maps to one control in the
//! settings window and one key in the persisted file. Slider-bound values are
//! clamped by [`HudConfig::validate`] when they enter the record (load or
//! edit); the renderer reads them as-is.

use std::ops::RangeInclusive;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use sidehud_common::{Rgb, Rgba, SchemaVersion};

/// Allowed gap between the two bars, in unscaled pixels.
pub const BAR_GAP_RANGE: RangeInclusive<f32> = 0.0..=300.0;
/// Allowed HUD scale.
pub const SCALE_RANGE: RangeInclusive<f32> = 0.25..=2.0;
/// Allowed offset from the screen centre on each axis.
pub const OFFSET_RANGE: RangeInclusive<f32> = -200.0..=200.0;
/// Allowed slidecast window in milliseconds.
pub const SLIDECAST_TIME_RANGE: RangeInclusive<f32> = 250.0..=1000.0;
/// Allowed text scale.
pub const FONT_SCALE_RANGE: RangeInclusive<f32> = 0.25..=2.0;
/// Allowed transparency percentage.
pub const TRANSPARENCY_RANGE: RangeInclusive<f32> = 0.0..=100.0;

/// Name of the style selected on first launch.
pub const DEFAULT_STYLE: &str = "CleanCurves";

/// Persisted HUD configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Schema version of the record.
    pub version: SchemaVersion,

    // === Toggles ===
    /// Hide the HUD entirely.
    pub hide_hud: bool,
    /// Show HP on the right bar and the resource on the left bar.
    pub flip_bars: bool,
    /// Only show the HUD while in combat.
    pub hide_combat: bool,
    /// Cast timers count up instead of down.
    pub cast_time_up: bool,
    /// Draw the cast bar over the left bar.
    pub flip_cast_bar: bool,
    /// Draw the slidecast window on the cast bar.
    pub show_slidecast: bool,
    /// Show percentages under the bars.
    pub show_percentage: bool,
    /// Show current values under the bars.
    pub show_numbers: bool,

    // === Layout ===
    /// HUD scale multiplier.
    pub scale: f32,
    /// Gap between the bars and the screen centre, unscaled.
    pub bar_gap: f32,
    /// Text scale multiplier.
    pub font_scale: f32,
    /// Opacity of every HUD color, in percent.
    pub transparency: f32,
    /// Slidecast window in milliseconds.
    pub slidecast_time: f32,
    /// Offset of the HUD anchor from the screen centre.
    pub offset: Vec2,

    // === Style ===
    /// Whether `selected_style` names a user style.
    pub is_user_style: bool,
    /// Name of the active style.
    pub selected_style: String,
    /// Directory scanned for user styles; empty disables user styles.
    pub user_style_path: String,

    // === Colors ===
    /// Bar background.
    pub bg_color: Rgb,
    /// HP fill.
    pub hp_color: Rgb,
    /// MP fill.
    pub mp_color: Rgb,
    /// CP fill.
    pub cp_color: Rgb,
    /// GP fill.
    pub gp_color: Rgb,
    /// Cast bar fill and cast label.
    pub cast_color: Rgb,
    /// Shield overlay.
    pub shield_color: Rgb,
    /// Slidecast window.
    pub slidecast_color: Rgb,
    /// Cast bar fill once the cast was interrupted.
    pub cast_interrupt_color: Rgb,
    /// Text outline.
    pub outline_color: Rgb,
    /// Action line of target casts that can be interrupted.
    pub interruptible_color: Rgb,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            version: SchemaVersion::HUD_CONFIG,

            hide_hud: false,
            flip_bars: false,
            hide_combat: false,
            cast_time_up: false,
            flip_cast_bar: false,
            show_slidecast: false,
            show_percentage: false,
            show_numbers: true,

            scale: 1.0,
            bar_gap: 100.0,
            font_scale: 1.0,
            transparency: 100.0,
            slidecast_time: 500.0,
            offset: Vec2::ZERO,

            is_user_style: false,
            selected_style: DEFAULT_STYLE.to_string(),
            user_style_path: String::new(),

            bg_color: Rgb::BLACK,
            hp_color: Rgb::new(0.258, 0.478, 0.082),
            mp_color: Rgb::new(0.705, 0.172, 0.4),
            cp_color: Rgb::new(0.466, 0.215, 0.592),
            gp_color: Rgb::new(0.172, 0.443, 0.584),
            cast_color: Rgb::new(0.878, 0.847, 0.796),
            shield_color: Rgb::new(1.0, 0.894, 0.372),
            slidecast_color: Rgb::new(0.215, 0.980, 0.180),
            cast_interrupt_color: Rgb::new(0.215, 0.980, 0.180),
            outline_color: Rgb::BLACK,
            interruptible_color: Rgb::new(0.937, 0.541, 0.184),
        }
    }
}

impl HudConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps every slider-bound value into its documented range.
    pub fn validate(&mut self) {
        self.bar_gap = clamp_to(self.bar_gap, &BAR_GAP_RANGE);
        self.scale = clamp_to(self.scale, &SCALE_RANGE);
        self.offset.x = clamp_to(self.offset.x, &OFFSET_RANGE);
        self.offset.y = clamp_to(self.offset.y, &OFFSET_RANGE);
        self.slidecast_time = clamp_to(self.slidecast_time, &SLIDECAST_TIME_RANGE);
        self.font_scale = clamp_to(self.font_scale, &FONT_SCALE_RANGE);
        self.transparency = clamp_to(self.transparency, &TRANSPARENCY_RANGE);

        for color in self.colors_mut() {
            *color = color.clamped();
        }
    }

    fn colors_mut(&mut self) -> [&mut Rgb; 11] {
        [
            &mut self.bg_color,
            &mut self.hp_color,
            &mut self.mp_color,
            &mut self.cp_color,
            &mut self.gp_color,
            &mut self.cast_color,
            &mut self.shield_color,
            &mut self.slidecast_color,
            &mut self.cast_interrupt_color,
            &mut self.outline_color,
            &mut self.interruptible_color,
        ]
    }

    fn alpha(&self, color: Rgb) -> Rgba {
        color.with_transparency(self.transparency)
    }

    /// Background color with alpha applied.
    #[must_use]
    pub fn bg_color_alpha(&self) -> Rgba {
        self.alpha(self.bg_color)
    }

    /// HP color with alpha applied.
    #[must_use]
    pub fn hp_color_alpha(&self) -> Rgba {
        self.alpha(self.hp_color)
    }

    /// MP color with alpha applied.
    #[must_use]
    pub fn mp_color_alpha(&self) -> Rgba {
        self.alpha(self.mp_color)
    }

    /// CP color with alpha applied.
    #[must_use]
    pub fn cp_color_alpha(&self) -> Rgba {
        self.alpha(self.cp_color)
    }

    /// GP color with alpha applied.
    #[must_use]
    pub fn gp_color_alpha(&self) -> Rgba {
        self.alpha(self.gp_color)
    }

    /// Cast color with alpha applied.
    #[must_use]
    pub fn cast_color_alpha(&self) -> Rgba {
        self.alpha(self.cast_color)
    }

    /// Shield color with alpha applied.
    #[must_use]
    pub fn shield_color_alpha(&self) -> Rgba {
        self.alpha(self.shield_color)
    }

    /// Slidecast color with alpha applied.
    #[must_use]
    pub fn slidecast_color_alpha(&self) -> Rgba {
        self.alpha(self.slidecast_color)
    }

    /// Interrupted cast color with alpha applied.
    #[must_use]
    pub fn cast_interrupt_color_alpha(&self) -> Rgba {
        self.alpha(self.cast_interrupt_color)
    }

    /// Outline color with alpha applied.
    #[must_use]
    pub fn outline_color_alpha(&self) -> Rgba {
        self.alpha(self.outline_color)
    }

    /// Interruptible cast color with alpha applied.
    #[must_use]
    pub fn interruptible_color_alpha(&self) -> Rgba {
        self.alpha(self.interruptible_color)
    }
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}
