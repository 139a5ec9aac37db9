//! The HUD compositor.
//!
//! Once per frame [`HudCompositor::draw`] reads the host, decides whether the
//! HUD is shown at all, and lays out two vertical bars either side of the
//! screen centre with the cast bar, shield, resource numbers and
//! target panels around them.

use egui::{Color32, Pos2, Vec2};
use sidehud_core::{
    gauge_text, target_header, ActorSnapshot, ActorState, Addon, BarAssignment, BarContent,
    CastSnapshot, CastState, HostServices, HudConfig, TargetSlot, TargetSnapshot,
};
use tracing::trace;

use crate::bar::{draw_bar_slice, BarSide};
use crate::draw_list::{to_color32, DrawList};
use crate::font::GlyphFont;
use crate::style::Style;
use crate::text::{draw_outline_text, measure_text, Orientation};

/// Outline rings around HUD text.
pub const OUTLINE_THICKNESS: u32 = 2;

/// Vertical space between the bars and the numbers under them.
pub const TEXT_SPACING: f32 = 4.0;

/// Space between a bar and the target panel next to it.
pub const PANEL_SPACING: f32 = 24.0;

/// Target panel text size relative to the HUD text.
pub const TARGET_TEXT_SCALE: f32 = 0.6;

/// Text scale applied to the host font before `font_scale` and `scale`.
pub const HOST_FONT_SCALE: f32 = 2.4;

/// How far above the bar's midpoint the anchor is raised, before scaling.
const ANCHOR_RAISE: f32 = 100.0;

/// Why a frame was not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The HUD is turned off.
    Hidden,
    /// Shown only in combat, and the player is not in combat.
    OutOfCombat,
    /// The host's own HUD is hidden or faded.
    WidgetsHidden,
    /// No local player.
    NoPlayer,
    /// The selected style is not installed.
    NoStyle,
}

/// What a drawn frame contained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawReport {
    /// The player's cast bar was drawn.
    pub cast_bar: bool,
    /// The slidecast window was drawn.
    pub slidecast: bool,
    /// The shield overlay was drawn.
    pub shield: bool,
    /// The target panel was drawn.
    pub target_panel: bool,
    /// The focus target panel was drawn.
    pub focus_panel: bool,
    /// Numbers under the bars were drawn.
    pub numbers: bool,
    /// Every string drawn, in draw order.
    pub texts: Vec<String>,
}

/// Result of one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// Nothing was drawn.
    Skipped(SkipReason),
    /// The HUD was drawn.
    Drawn(DrawReport),
}

impl DrawOutcome {
    /// Whether the HUD was drawn.
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }

    /// The report of a drawn frame.
    #[must_use]
    pub fn report(&self) -> Option<&DrawReport> {
        match self {
            Self::Drawn(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }
}

/// Everything a frame borrows.
pub struct HudContext<'a> {
    /// Configuration.
    pub config: &'a HudConfig,
    /// Selected style, if installed.
    pub style: Option<&'a Style>,
    /// Font for every HUD string.
    pub font: &'a dyn GlyphFont,
    /// Host state accessors.
    pub host: HostServices<'a>,
    /// Size of the game viewport.
    pub viewport: Vec2,
}

/// Draws the HUD.
#[derive(Debug, Clone)]
pub struct HudCompositor {
    /// Master switch, independent of the configuration.
    pub visible: bool,
}

impl Default for HudCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl HudCompositor {
    /// Creates a visible compositor.
    #[must_use]
    pub fn new() -> Self {
        Self { visible: true }
    }

    /// Draws one frame.
    pub fn draw(&self, ctx: &HudContext<'_>, list: &mut dyn DrawList) -> DrawOutcome {
        let config = ctx.config;
        let host = ctx.host;

        if !self.visible || config.hide_hud {
            trace!("HUD hidden");
            return DrawOutcome::Skipped(SkipReason::Hidden);
        }
        if config.hide_combat && !host.client.in_combat() {
            trace!("Out of combat");
            return DrawOutcome::Skipped(SkipReason::OutOfCombat);
        }
        let parameters_shown = host.gui.addon_visible(Addon::ParameterWidget) == Some(true);
        let faded = host.gui.addon_visible(Addon::FadeMiddle) != Some(false);
        if !parameters_shown || faded {
            trace!(parameters_shown, faded, "Host HUD hidden");
            return DrawOutcome::Skipped(SkipReason::WidgetsHidden);
        }
        let Some(player) = host
            .client
            .local_player()
            .and_then(|actor| ActorSnapshot::read(&host, actor))
        else {
            trace!("No local player");
            return DrawOutcome::Skipped(SkipReason::NoPlayer);
        };
        let Some(style) = ctx.style else {
            trace!(style = %config.selected_style, "Style not installed");
            return DrawOutcome::Skipped(SkipReason::NoStyle);
        };

        let mut frame = Frame {
            config,
            style,
            font: ctx.font,
            list,
            layout: Layout::new(config, style, ctx.viewport),
            report: DrawReport::default(),
        };
        frame.draw_player(&player);
        frame.draw_targets(&host);

        DrawOutcome::Drawn(frame.report)
    }
}

/// Screen positions shared by every element of a frame.
#[derive(Debug, Clone, Copy)]
struct Layout {
    anchor: Pos2,
    scale: f32,
    gap: f32,
    bar_size: Vec2,
    left: Pos2,
    right: Pos2,
}

impl Layout {
    fn new(config: &HudConfig, style: &Style, viewport: Vec2) -> Self {
        let scale = config.scale;
        let gap = config.bar_gap * scale;
        let bar_size = style.bar_background.size * scale;

        let raise = (style.bar_background.size.y / 2.0 + ANCHOR_RAISE) * scale;
        let anchor = Pos2::new(
            viewport.x / 2.0 + config.offset.x,
            viewport.y / 2.0 + config.offset.y - raise,
        );

        Self {
            anchor,
            scale,
            gap,
            bar_size,
            left: Pos2::new(anchor.x - bar_size.x - gap, anchor.y),
            right: Pos2::new(anchor.x + gap, anchor.y),
        }
    }

    fn bar_origin(&self, side: BarSide) -> Pos2 {
        match side {
            BarSide::Left => self.left,
            BarSide::Right => self.right,
        }
    }

    fn panel_origin(&self, slot: TargetSlot) -> Pos2 {
        let offset = self.gap + self.bar_size.x + PANEL_SPACING * self.scale;
        match slot {
            TargetSlot::Target => Pos2::new(self.anchor.x + offset, self.anchor.y),
            TargetSlot::FocusTarget => {
                Pos2::new(self.anchor.x - offset - self.bar_size.x, self.anchor.y)
            }
        }
    }
}

struct Frame<'f> {
    config: &'f HudConfig,
    style: &'f Style,
    font: &'f dyn GlyphFont,
    list: &'f mut dyn DrawList,
    layout: Layout,
    report: DrawReport,
}

impl Frame<'_> {
    fn cast_side(&self) -> BarSide {
        if self.config.flip_cast_bar {
            BarSide::Left
        } else {
            BarSide::Right
        }
    }

    fn text_scale(&self) -> f32 {
        HOST_FONT_SCALE * self.config.font_scale * self.layout.scale
    }

    fn slice(
        &mut self,
        image: Image,
        side: BarSide,
        origin: Pos2,
        from: f32,
        to: f32,
        color: Color32,
    ) -> bool {
        let style = self.style;
        let image = match image {
            Image::Bar => &style.bar,
            Image::BarBackground => &style.bar_background,
            Image::Cast => &style.cast,
            Image::CastBackground => &style.cast_background,
        };
        draw_bar_slice(
            &mut *self.list,
            image,
            side,
            origin,
            self.layout.scale,
            from,
            to,
            color,
        )
    }

    fn text(&mut self, text: String, scale: f32, position: Pos2, color: Color32) {
        draw_outline_text(
            &mut *self.list,
            self.font,
            &text,
            scale,
            position,
            color,
            to_color32(self.config.outline_color_alpha()),
            OUTLINE_THICKNESS,
            Orientation::Horizontal,
        );
        self.report.texts.push(text);
    }

    fn draw_player(&mut self, player: &ActorSnapshot) {
        let state = ActorState::derive(&player.resources, self.config);
        let bars = BarAssignment::new(&state, self.config.flip_bars);

        self.draw_bar(BarSide::Left, &bars.left);
        self.draw_bar(BarSide::Right, &bars.right);
        self.draw_shield(player.shield_fraction);
        self.draw_numbers(&bars);
    }

    fn draw_bar(&mut self, side: BarSide, content: &BarContent) {
        let origin = self.layout.bar_origin(side);
        let background = to_color32(self.config.bg_color_alpha());

        self.slice(Image::BarBackground, side, origin, 0.0, 1.0, background);
        self.slice(
            Image::Bar,
            side,
            origin,
            1.0 - content.fraction,
            1.0,
            to_color32(content.color),
        );
        self.slice(Image::CastBackground, side, origin, 0.0, 1.0, background);
    }

    fn draw_shield(&mut self, fraction: f32) {
        let side = self.cast_side().opposite();
        let origin = self.layout.bar_origin(side);
        let color = to_color32(self.config.shield_color_alpha());
        self.report.shield = self.slice(Image::Cast, side, origin, 0.0, fraction, color);
    }

    fn draw_numbers(&mut self, bars: &BarAssignment) {
        let scale = self.text_scale();
        let y = self.layout.anchor.y + self.layout.bar_size.y + TEXT_SPACING * self.layout.scale;

        if let Some(text) = gauge_text(&bars.left, self.config) {
            let width = measure_text(self.font, &text, scale).x;
            let x = self.layout.anchor.x - self.layout.gap - width;
            self.text(text, scale, Pos2::new(x, y), to_color32(bars.left.color));
            self.report.numbers = true;
        }
        if let Some(text) = gauge_text(&bars.right, self.config) {
            let x = self.layout.anchor.x + self.layout.gap;
            self.text(text, scale, Pos2::new(x, y), to_color32(bars.right.color));
            self.report.numbers = true;
        }
    }

    fn draw_targets(&mut self, host: &HostServices<'_>) {
        if let Some(cast) = CastSnapshot::read_player(host.gui) {
            self.draw_cast(&cast);
        }
        for slot in [TargetSlot::Target, TargetSlot::FocusTarget] {
            if let Some(target) = TargetSnapshot::read(host, slot) {
                self.draw_panel(&target);
            }
        }
    }

    fn draw_cast(&mut self, cast: &CastSnapshot) {
        let state = CastState::derive(cast, self.config);
        let side = self.cast_side();
        let origin = self.layout.bar_origin(side);

        self.slice(
            Image::Cast,
            side,
            origin,
            1.0 - state.fraction,
            1.0,
            to_color32(state.color),
        );
        self.report.cast_bar = true;

        if self.config.show_slidecast {
            if let Some(slidecast) = state.slidecast_fraction {
                let color = to_color32(self.config.slidecast_color_alpha());
                self.report.slidecast = self.slice(Image::Cast, side, origin, 0.0, slidecast, color);
            }
        }

        let scale = self.text_scale();
        let size = measure_text(self.font, &state.label, scale);
        let x = match side {
            BarSide::Right => self.layout.anchor.x + self.layout.gap,
            BarSide::Left => self.layout.anchor.x - self.layout.gap - size.x,
        };
        let position = Pos2::new(x, self.layout.anchor.y - size.y);
        let color = to_color32(self.config.cast_color_alpha());
        self.text(state.label, scale, position, color);
    }

    fn draw_panel(&mut self, target: &TargetSnapshot) {
        let (side, outboard) = match target.slot {
            TargetSlot::Target => (BarSide::Right, true),
            TargetSlot::FocusTarget => (BarSide::Left, false),
        };
        let origin = self.layout.panel_origin(target.slot);

        if let Some(cast) = &target.cast {
            let state = CastState::derive(cast, self.config);
            let background = to_color32(self.config.bg_color_alpha());
            self.slice(Image::CastBackground, side, origin, 0.0, 1.0, background);
            self.slice(
                Image::Cast,
                side,
                origin,
                1.0 - state.fraction,
                1.0,
                to_color32(state.color),
            );
        }

        let mut lines = vec![(
            target_header(&target.name, target.hp),
            self.config.hp_color_alpha(),
        )];
        if let Some(cast) = &target.cast {
            let color = if cast.interruptible {
                self.config.interruptible_color_alpha()
            } else {
                self.config.cast_color_alpha()
            };
            lines.push((cast.cast_name.clone(), color));
            if cast.interrupted {
                lines.push(("Interrupted".to_string(), self.config.cast_interrupt_color_alpha()));
            }
        }

        let scale = self.text_scale() * TARGET_TEXT_SCALE;
        let spacing = TEXT_SPACING * self.layout.scale;
        let mut y = origin.y;
        for (text, color) in lines {
            let size = measure_text(self.font, &text, scale);
            let x = if outboard {
                origin.x + self.layout.bar_size.x + spacing
            } else {
                origin.x - spacing - size.x
            };
            self.text(text, scale, Pos2::new(x, y), to_color32(color));
            y += size.y;
        }

        match target.slot {
            TargetSlot::Target => self.report.target_panel = true,
            TargetSlot::FocusTarget => self.report.focus_panel = true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Image {
    Bar,
    BarBackground,
    Cast,
    CastBackground,
}
