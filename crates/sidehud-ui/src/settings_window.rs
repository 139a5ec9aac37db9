//! Settings window.
//!
//! Edits the configuration in place and reports what happened as
//! [`SettingsAction`]s; persisting and reloading styles is up to the caller.

use std::ops::RangeInclusive;

use egui::{Color32, Context, Pos2, Sense, Ui, Vec2};
use sidehud_common::Rgb;
use sidehud_core::{
    HudConfig, BAR_GAP_RANGE, FONT_SCALE_RANGE, OFFSET_RANGE, SCALE_RANGE, SLIDECAST_TIME_RANGE,
    TRANSPARENCY_RANGE,
};

use crate::bar::{draw_bar_slice, BarSide};
use crate::draw_list::{to_color32, DrawList, EguiDrawList};
use crate::style::{Style, StyleKind, StyleRegistry};

/// Title of the main window.
pub const WINDOW_TITLE: &str = "Side HUD configuration";

/// Height of a style preview in the style picker.
pub const PREVIEW_HEIGHT: f32 = 120.0;

/// Something the user did in the settings window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// The configuration was edited and should be saved.
    ConfigChanged,
    /// The user asked for user styles to be rescanned.
    ReloadUserStyles,
    /// A style was picked.
    SelectStyle {
        /// Style name.
        name: String,
        /// Where the style comes from.
        kind: StyleKind,
    },
    /// The user style path was changed; user styles need reloading.
    UserStylePathChanged(String),
}

/// The settings window and its sub-windows.
#[derive(Debug, Default)]
pub struct SettingsWindow {
    /// Whether the main window is shown.
    pub open: bool,
    style_picker_open: bool,
    path_editor_open: bool,
    path_buffer: String,
    pending_actions: Vec<SettingsAction>,
}

impl SettingsWindow {
    /// Creates a closed window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows or hides the window.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Closes the window and its sub-windows.
    pub fn close(&mut self) {
        self.open = false;
        self.style_picker_open = false;
        self.path_editor_open = false;
    }

    /// Whether the style picker is shown.
    #[must_use]
    pub fn style_picker_open(&self) -> bool {
        self.style_picker_open
    }

    /// Whether the user style path editor is shown.
    #[must_use]
    pub fn path_editor_open(&self) -> bool {
        self.path_editor_open
    }

    /// Draws the window for this frame and returns what the user did.
    pub fn show(
        &mut self,
        ctx: &Context,
        config: &mut HudConfig,
        styles: &StyleRegistry,
    ) -> Vec<SettingsAction> {
        self.pending_actions.clear();
        if !self.open {
            return Vec::new();
        }

        let mut open = self.open;
        egui::Window::new(WINDOW_TITLE)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| self.contents(ui, config));
        if !open {
            self.close();
        }

        if self.style_picker_open {
            let mut picker_open = true;
            egui::Window::new("Change style")
                .open(&mut picker_open)
                .collapsible(false)
                .show(ctx, |ui| self.style_picker(ui, config, styles));
            self.style_picker_open &= picker_open;
        }

        if self.path_editor_open {
            let mut editor_open = true;
            egui::Window::new("Set user style path")
                .open(&mut editor_open)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| self.path_editor(ui, config));
            self.path_editor_open &= editor_open;
        }

        std::mem::take(&mut self.pending_actions)
    }

    /// Makes `name` the selected style.
    pub fn select_style(&mut self, config: &mut HudConfig, name: &str, kind: StyleKind) {
        if config.selected_style == name && config.is_user_style == kind.is_user() {
            return;
        }
        config.selected_style = name.to_string();
        config.is_user_style = kind.is_user();
        self.pending_actions.push(SettingsAction::SelectStyle {
            name: name.to_string(),
            kind,
        });
        self.mark_changed();
    }

    /// Opens the path editor seeded with the configured path.
    pub fn open_path_editor(&mut self, config: &HudConfig) {
        self.path_buffer.clone_from(&config.user_style_path);
        self.path_editor_open = true;
    }

    /// Stores the edited user style path.
    pub fn commit_path(&mut self, config: &mut HudConfig) {
        self.path_editor_open = false;
        let path = self.path_buffer.trim().to_string();
        if path == config.user_style_path {
            return;
        }
        config.user_style_path.clone_from(&path);
        self.pending_actions
            .push(SettingsAction::UserStylePathChanged(path));
        self.mark_changed();
    }

    fn mark_changed(&mut self) {
        if !self.pending_actions.contains(&SettingsAction::ConfigChanged) {
            self.pending_actions.push(SettingsAction::ConfigChanged);
        }
    }

    fn contents(&mut self, ui: &mut Ui, config: &mut HudConfig) {
        let mut changed = false;

        ui.heading("Display");
        changed |= ui.checkbox(&mut config.hide_hud, "Hide HUD").changed();
        changed |= ui
            .checkbox(&mut config.hide_combat, "Only show in combat")
            .changed();
        changed |= ui
            .checkbox(&mut config.flip_bars, "Swap HP and resource bars")
            .changed();
        changed |= ui
            .checkbox(&mut config.flip_cast_bar, "Cast bar on the left")
            .changed();
        changed |= ui
            .checkbox(&mut config.cast_time_up, "Count cast time up")
            .changed();
        changed |= ui
            .checkbox(&mut config.show_slidecast, "Show slidecast window")
            .changed();
        changed |= ui
            .checkbox(&mut config.show_numbers, "Show numbers")
            .changed();
        changed |= ui
            .checkbox(&mut config.show_percentage, "Show percentages")
            .changed();

        ui.separator();
        ui.heading("Layout");
        changed |= slider(ui, "Scale", &mut config.scale, SCALE_RANGE);
        changed |= slider(ui, "Bar gap", &mut config.bar_gap, BAR_GAP_RANGE);
        changed |= slider(ui, "Font scale", &mut config.font_scale, FONT_SCALE_RANGE);
        changed |= slider(ui, "Opacity", &mut config.transparency, TRANSPARENCY_RANGE);
        changed |= slider(ui, "Horizontal offset", &mut config.offset.x, OFFSET_RANGE);
        changed |= slider(ui, "Vertical offset", &mut config.offset.y, OFFSET_RANGE);
        ui.add_enabled_ui(config.show_slidecast, |ui| {
            changed |= slider(
                ui,
                "Slidecast time (ms)",
                &mut config.slidecast_time,
                SLIDECAST_TIME_RANGE,
            );
        });

        ui.separator();
        ui.heading("Colors");
        egui::Grid::new("sidehud_colors")
            .num_columns(2)
            .show(ui, |ui| {
                changed |= color_row(ui, "Background", &mut config.bg_color);
                changed |= color_row(ui, "HP", &mut config.hp_color);
                changed |= color_row(ui, "MP", &mut config.mp_color);
                changed |= color_row(ui, "CP", &mut config.cp_color);
                changed |= color_row(ui, "GP", &mut config.gp_color);
                changed |= color_row(ui, "Cast", &mut config.cast_color);
                changed |= color_row(ui, "Shield", &mut config.shield_color);
                changed |= color_row(ui, "Slidecast", &mut config.slidecast_color);
                changed |= color_row(ui, "Interrupted", &mut config.cast_interrupt_color);
                changed |= color_row(ui, "Interruptible", &mut config.interruptible_color);
                changed |= color_row(ui, "Outline", &mut config.outline_color);
            });

        ui.separator();
        ui.heading("Style");
        ui.label(format!(
            "{} ({})",
            config.selected_style,
            if config.is_user_style { "user" } else { "built-in" }
        ));
        ui.horizontal(|ui| {
            if ui.button("Change style").clicked() {
                self.style_picker_open = !self.style_picker_open;
            }
            if ui.button("Set user style path").clicked() {
                self.open_path_editor(config);
            }
            if ui.button("Reload user styles").clicked() {
                self.pending_actions.push(SettingsAction::ReloadUserStyles);
            }
        });

        if changed {
            config.validate();
            self.mark_changed();
        }
    }

    fn style_picker(&mut self, ui: &mut Ui, config: &mut HudConfig, styles: &StyleRegistry) {
        for (kind, heading) in [
            (StyleKind::BuiltIn, "Built-in styles"),
            (StyleKind::User, "User styles"),
        ] {
            ui.heading(heading);
            if styles.count(kind) == 0 {
                ui.label("None installed");
                continue;
            }

            let mut picked = None;
            ui.horizontal_wrapped(|ui| {
                for style in styles.styles(kind) {
                    let selected = config.selected_style == style.name
                        && config.is_user_style == kind.is_user();
                    if style_tile(ui, style, config, selected) {
                        picked = Some(style.name.clone());
                    }
                }
            });
            if let Some(name) = picked {
                self.select_style(config, &name, kind);
            }
            ui.separator();
        }
    }

    fn path_editor(&mut self, ui: &mut Ui, config: &mut HudConfig) {
        ui.label("Directory containing one folder per user style:");
        ui.text_edit_singleline(&mut self.path_buffer);
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                self.commit_path(config);
            }
            if ui.button("Cancel").clicked() {
                self.path_editor_open = false;
            }
        });
    }
}

fn slider(ui: &mut Ui, label: &str, value: &mut f32, range: RangeInclusive<f32>) -> bool {
    ui.add(egui::Slider::new(value, range).text(label)).changed()
}

fn color_row(ui: &mut Ui, label: &str, color: &mut Rgb) -> bool {
    ui.label(label);
    let mut rgb = color.to_array();
    let changed = ui.color_edit_button_rgb(&mut rgb).changed();
    ui.end_row();
    if changed {
        *color = Rgb::new(rgb[0], rgb[1], rgb[2]);
    }
    changed
}

/// Draws one clickable preview with its name underneath. Returns whether it
/// was clicked.
fn style_tile(ui: &mut Ui, style: &Style, config: &HudConfig, selected: bool) -> bool {
    let scale = preview_scale(style);
    let size = Vec2::new(
        (style.bar_background.size.x * scale).max(1.0),
        PREVIEW_HEIGHT,
    );

    let mut clicked = false;
    ui.vertical(|ui| {
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        let mut list = EguiDrawList::new();
        draw_style_preview(&mut list, style, config, rect.min, scale);
        list.paint(ui.painter());
        if selected {
            ui.painter().rect_stroke(
                rect.expand(2.0),
                2.0,
                (1.0, Color32::LIGHT_BLUE),
            );
        }
        clicked |= response.clicked();
        clicked |= ui.selectable_label(selected, &style.name).clicked();
    });
    clicked
}

/// Scale fitting a style's bar into [`PREVIEW_HEIGHT`].
#[must_use]
pub fn preview_scale(style: &Style) -> f32 {
    let height = style.bar_background.size.y;
    if height > 0.0 {
        PREVIEW_HEIGHT / height
    } else {
        1.0
    }
}

/// Draws a style sample: a three-quarter bar in the MP color with a
/// half-finished cast over it.
pub fn draw_style_preview(
    list: &mut dyn DrawList,
    style: &Style,
    config: &HudConfig,
    top_left: Pos2,
    scale: f32,
) {
    let background = to_color32(config.bg_color_alpha());
    let side = BarSide::Right;

    draw_bar_slice(list, &style.bar_background, side, top_left, scale, 0.0, 1.0, background);
    draw_bar_slice(
        list,
        &style.bar,
        side,
        top_left,
        scale,
        0.25,
        1.0,
        to_color32(config.mp_color_alpha()),
    );
    draw_bar_slice(list, &style.cast_background, side, top_left, scale, 0.0, 1.0, background);
    draw_bar_slice(
        list,
        &style.cast,
        side,
        top_left,
        scale,
        0.5,
        1.0,
        to_color32(config.cast_color_alpha()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::RecordingDrawList;
    use crate::style::StyleImage;
    use egui::{RawInput, TextureId};

    fn style() -> Style {
        let size = Vec2::new(30.0, 240.0);
        Style {
            name: "Preview".to_string(),
            bar: StyleImage::new(TextureId::User(1), size),
            bar_background: StyleImage::new(TextureId::User(2), size),
            cast: StyleImage::new(TextureId::User(3), size),
            cast_background: StyleImage::new(TextureId::User(4), size),
        }
    }

    fn run(window: &mut SettingsWindow, config: &mut HudConfig) -> Vec<SettingsAction> {
        let ctx = Context::default();
        let registry = StyleRegistry::new();
        let mut actions = Vec::new();
        let _ = ctx.run(RawInput::default(), |ctx| {
            actions = window.show(ctx, config, &registry);
        });
        actions
    }

    #[test]
    fn test_closed_window_does_nothing() {
        let mut window = SettingsWindow::new();
        let mut config = HudConfig::default();
        assert!(run(&mut window, &mut config).is_empty());
    }

    #[test]
    fn test_open_window_without_input_changes_nothing() {
        let mut window = SettingsWindow::new();
        window.toggle();
        let mut config = HudConfig::default();

        assert!(run(&mut window, &mut config).is_empty());
        assert!(window.open);
        assert_eq!(config, HudConfig::default());
    }

    #[test]
    fn test_select_style() {
        let mut window = SettingsWindow::new();
        let mut config = HudConfig::default();

        window.select_style(&mut config, "Neon", StyleKind::User);
        assert_eq!(config.selected_style, "Neon");
        assert!(config.is_user_style);

        let actions = std::mem::take(&mut window.pending_actions);
        assert_eq!(
            actions,
            vec![
                SettingsAction::SelectStyle {
                    name: "Neon".to_string(),
                    kind: StyleKind::User,
                },
                SettingsAction::ConfigChanged,
            ]
        );

        window.select_style(&mut config, "Neon", StyleKind::User);
        assert!(window.pending_actions.is_empty());
    }

    #[test]
    fn test_commit_path() {
        let mut window = SettingsWindow::new();
        let mut config = HudConfig::default();

        window.open_path_editor(&config);
        assert!(window.path_editor_open());
        window.path_buffer = "  /home/me/styles ".to_string();
        window.commit_path(&mut config);

        assert!(!window.path_editor_open());
        assert_eq!(config.user_style_path, "/home/me/styles");
        assert!(window
            .pending_actions
            .contains(&SettingsAction::UserStylePathChanged("/home/me/styles".to_string())));
        assert!(window.pending_actions.contains(&SettingsAction::ConfigChanged));
    }

    #[test]
    fn test_close_closes_sub_windows() {
        let mut window = SettingsWindow::new();
        window.toggle();
        window.open_path_editor(&HudConfig::default());
        window.close();
        assert!(!window.open);
        assert!(!window.path_editor_open());
        assert!(!window.style_picker_open());
    }

    #[test]
    fn test_style_preview() {
        let style = style();
        let config = HudConfig::default();
        let mut list = RecordingDrawList::new();
        let scale = preview_scale(&style);
        draw_style_preview(&mut list, &style, &config, Pos2::new(10.0, 10.0), scale);

        assert_eq!(scale, 0.5);
        assert_eq!(list.quads.len(), 4);
        let bar = list.quads_with(TextureId::User(1)).next().expect("bar drawn");
        assert_eq!(bar.bounds().min, Pos2::new(10.0, 40.0));
        assert_eq!(bar.bounds().max, Pos2::new(25.0, 130.0));
        let cast = list.quads_with(TextureId::User(3)).next().expect("cast drawn");
        assert_eq!(cast.bounds().min.y, 70.0);
    }

    #[test]
    fn test_preview_scale_degenerate_image() {
        let mut style = style();
        style.bar_background.size = Vec2::ZERO;
        assert_eq!(preview_scale(&style), 1.0);
    }
}
