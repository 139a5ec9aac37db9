//! The plugin object the host talks to.
//!
//! [`SideHudPlugin`] ties the pieces together: it loads the configuration
//! and styles at startup, answers the chat command and the host's settings
//! hook, and draws the settings window and the HUD every frame.

use std::path::{Path, PathBuf};

use egui::{Context, Id, LayerId, Order};
use sidehud_common::HudResult;
use sidehud_core::{HostServices, HudConfig};
use sidehud_ui::{
    DrawOutcome, EguiDrawList, GlyphFont, HudCompositor, HudContext, ImageLoader, SettingsAction,
    SettingsWindow, SkipReason, StyleRegistry,
};
use tracing::{debug, error, info, warn};

use crate::settings_persistence::SettingsManager;

/// Chat command toggling the settings window.
pub const COMMAND: &str = "/pside";

/// Help text registered with the command.
pub const COMMAND_HELP: &str = "Opens the Side HUD configuration";

/// Name shown by the host.
pub const PLUGIN_NAME: &str = "Side HUD";

/// Layer the HUD is painted on, below every window.
#[must_use]
pub fn hud_layer() -> LayerId {
    LayerId::new(Order::Background, Id::new("side_hud"))
}

/// The Side HUD plugin.
pub struct SideHudPlugin {
    settings: SettingsManager,
    styles: StyleRegistry,
    compositor: HudCompositor,
    window: SettingsWindow,
    loader: Box<dyn ImageLoader>,
    plugin_dir: PathBuf,
    disposed: bool,
}

impl SideHudPlugin {
    /// Starts the plugin: loads the configuration, the built-in styles from
    /// `plugin_dir` and the user styles, then saves the configuration if
    /// anything had to be corrected.
    pub fn new(
        mut settings: SettingsManager,
        loader: Box<dyn ImageLoader>,
        plugin_dir: impl Into<PathBuf>,
    ) -> Self {
        settings.load_or_default();

        let mut plugin = Self {
            settings,
            styles: StyleRegistry::new(),
            compositor: HudCompositor::new(),
            window: SettingsWindow::new(),
            loader,
            plugin_dir: plugin_dir.into(),
            disposed: false,
        };

        let built_in = plugin
            .styles
            .load_built_in(plugin.loader.as_mut(), &plugin.plugin_dir);
        let user = plugin.load_user_styles();
        info!("{} started with {} built-in and {} user styles", PLUGIN_NAME, built_in, user);

        plugin.check_selection();
        plugin.save();
        plugin
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &HudConfig {
        self.settings.config()
    }

    /// The settings file owner.
    #[must_use]
    pub fn settings(&self) -> &SettingsManager {
        &self.settings
    }

    /// Installed styles.
    #[must_use]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// The settings window.
    #[must_use]
    pub fn window(&self) -> &SettingsWindow {
        &self.window
    }

    /// Directory the plugin was installed to.
    #[must_use]
    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Whether [`SideHudPlugin::dispose`] ran.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Handles a chat command. Returns whether it was ours.
    pub fn handle_command(&mut self, command: &str, args: &str) -> bool {
        if !command.trim().eq_ignore_ascii_case(COMMAND) {
            return false;
        }
        if !args.trim().is_empty() {
            debug!("Ignoring arguments to {}: {}", COMMAND, args);
        }
        self.toggle_window();
        true
    }

    /// Host hook for the plugin's settings button.
    pub fn open_config(&mut self) {
        self.toggle_window();
    }

    fn toggle_window(&mut self) {
        if self.disposed {
            return;
        }
        self.window.toggle();
        info!(open = self.window.open, "Toggled configuration window");
    }

    /// Draws one frame: the settings window first, then the HUD on the
    /// background layer.
    pub fn draw(
        &mut self,
        ctx: &Context,
        host: HostServices<'_>,
        font: &dyn GlyphFont,
    ) -> DrawOutcome {
        if self.disposed {
            return DrawOutcome::Skipped(SkipReason::Hidden);
        }

        let actions = self
            .window
            .show(ctx, self.settings.config_mut(), &self.styles);
        self.apply_actions(actions);

        let config = self.settings.config();
        let hud = HudContext {
            config,
            style: self.styles.resolve(config),
            font,
            host,
            viewport: ctx.screen_rect().size(),
        };

        let mut list = EguiDrawList::new();
        let outcome = self.compositor.draw(&hud, &mut list);
        list.paint(&ctx.layer_painter(hud_layer()));
        outcome
    }

    /// Applies what the user did in the settings window and saves.
    pub fn apply_actions(&mut self, actions: Vec<SettingsAction>) {
        if actions.is_empty() {
            return;
        }

        for action in actions {
            match action {
                SettingsAction::ConfigChanged => self.settings.mark_dirty(),
                SettingsAction::ReloadUserStyles => {
                    self.reload_user_styles();
                }
                SettingsAction::SelectStyle { name, kind } => {
                    info!(?kind, "Selected style {}", name);
                }
                SettingsAction::UserStylePathChanged(path) => {
                    info!("User style path set to {:?}", path);
                    self.reload_user_styles();
                }
            }
        }

        self.save();
    }

    /// Drops every user style and rescans the configured path. Returns how
    /// many styles were loaded.
    pub fn reload_user_styles(&mut self) -> usize {
        let count = match self.styles.reload_user_styles(
            self.loader.as_mut(),
            Path::new(&self.settings.config().user_style_path),
        ) {
            Ok(count) => count,
            Err(e) => {
                warn!("User styles not reloaded: {}", e);
                0
            }
        };
        self.check_selection();
        count
    }

    fn load_user_styles(&mut self) -> usize {
        let root = PathBuf::from(&self.settings.config().user_style_path);
        self.styles
            .load_user_styles(self.loader.as_mut(), &root)
            .unwrap_or(0)
    }

    fn check_selection(&mut self) {
        if self.styles.ensure_selection(self.settings.config_mut()) {
            self.settings.mark_dirty();
        }
    }

    /// Writes the configuration if it changed since the last save.
    pub fn persist(&mut self) -> HudResult<()> {
        self.settings.auto_save_if_dirty()?;
        Ok(())
    }

    fn save(&mut self) {
        if let Err(e) = self.persist() {
            error!("Failed to save settings: {}", e);
        }
    }

    /// Releases styles and closes windows. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.window.close();
        self.styles.clear();
        self.save();
        self.disposed = true;
        info!("{} disposed", PLUGIN_NAME);
    }
}

impl Drop for SideHudPlugin {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{RawInput, TextureId, Vec2};
    use sidehud_common::{HudError, StyleError};
    use sidehud_core::testkit::FakeHost;
    use sidehud_ui::{BitmapFont, StyleImage, StyleKind, BUILT_IN_STYLES, STYLE_IMAGE_FILES};
    use std::fs;

    struct FakeLoader;

    impl ImageLoader for FakeLoader {
        fn load(&mut self, _path: &Path) -> Result<StyleImage, StyleError> {
            Ok(StyleImage::new(TextureId::User(1), Vec2::new(40.0, 200.0)))
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let styles = StyleRegistry::built_in_root(&dir.path().join("plugin"));
            for name in BUILT_IN_STYLES {
                write_style(&styles.join(name));
            }
            Self { dir }
        }

        fn settings_path(&self) -> PathBuf {
            self.dir.path().join("config").join("settings.toml")
        }

        fn user_root(&self) -> PathBuf {
            self.dir.path().join("user")
        }

        fn plugin(&self) -> SideHudPlugin {
            SideHudPlugin::new(
                SettingsManager::with_path(self.settings_path()),
                Box::new(FakeLoader),
                self.dir.path().join("plugin"),
            )
        }
    }

    fn write_style(dir: &Path) {
        fs::create_dir_all(dir).expect("mkdir");
        for file in STYLE_IMAGE_FILES {
            fs::write(dir.join(file), b"png").expect("write");
        }
    }

    fn font() -> BitmapFont {
        BitmapFont::from_grid(TextureId::User(2), 10.0, 5.0, 16, 1, "0123456789()% ")
    }

    #[test]
    fn test_persist_reports_io_errors() {
        let fixture = Fixture::new();
        let mut plugin = fixture.plugin();
        plugin.apply_actions(vec![SettingsAction::ConfigChanged]);
        assert!(plugin.persist().is_ok());

        // A file where the settings directory should be.
        let blocked = Fixture::new();
        fs::write(blocked.dir.path().join("config"), b"").expect("write");
        let mut plugin = blocked.plugin();
        plugin.apply_actions(vec![SettingsAction::ConfigChanged]);
        assert!(plugin.settings().is_dirty());
        assert!(matches!(plugin.persist(), Err(HudError::Io(_))));
    }

    #[test]
    fn test_startup_loads_styles_and_saves_defaults() {
        let fixture = Fixture::new();
        let plugin = fixture.plugin();

        assert_eq!(plugin.styles().count(StyleKind::BuiltIn), 3);
        assert!(plugin.styles().resolve(plugin.config()).is_some());
        assert!(fixture.settings_path().exists());
        assert!(!plugin.settings().is_dirty());
    }

    #[test]
    fn test_missing_user_style_falls_back_and_saves() {
        let fixture = Fixture::new();
        let mut settings = SettingsManager::with_path(fixture.settings_path());
        settings.update(|config| {
            config.selected_style = "Gone".to_string();
            config.is_user_style = true;
        });
        settings.save().expect("save");

        let plugin = fixture.plugin();
        assert_eq!(plugin.config().selected_style, "CleanCurves");
        assert!(!plugin.config().is_user_style);

        let mut reloaded = SettingsManager::with_path(fixture.settings_path());
        reloaded.load().expect("load");
        assert_eq!(reloaded.config().selected_style, "CleanCurves");
    }

    #[test]
    fn test_command_toggles_window() {
        let fixture = Fixture::new();
        let mut plugin = fixture.plugin();

        assert!(!plugin.handle_command("/other", ""));
        assert!(!plugin.window().open);
        assert!(plugin.handle_command("/pside", ""));
        assert!(plugin.window().open);
        plugin.open_config();
        assert!(!plugin.window().open);
    }

    #[test]
    fn test_user_style_path_change_reloads() {
        let fixture = Fixture::new();
        write_style(&fixture.user_root().join("Mine"));
        let mut plugin = fixture.plugin();
        assert_eq!(plugin.styles().count(StyleKind::User), 0);

        let root = fixture.user_root().display().to_string();
        plugin.settings.config_mut().user_style_path.clone_from(&root);
        plugin.apply_actions(vec![
            SettingsAction::UserStylePathChanged(root),
            SettingsAction::ConfigChanged,
        ]);

        assert_eq!(plugin.styles().count(StyleKind::User), 1);
        assert!(!plugin.settings().is_dirty());
        let mut reloaded = SettingsManager::with_path(fixture.settings_path());
        reloaded.load().expect("load");
        assert_eq!(reloaded.config().user_style_path, fixture.user_root().display().to_string());
    }

    #[test]
    fn test_reload_drops_deleted_selected_style() {
        let fixture = Fixture::new();
        write_style(&fixture.user_root().join("Mine"));
        let mut settings = SettingsManager::with_path(fixture.settings_path());
        settings.update(|config| {
            config.user_style_path = fixture.user_root().display().to_string();
            config.selected_style = "Mine".to_string();
            config.is_user_style = true;
        });
        settings.save().expect("save");

        let mut plugin = fixture.plugin();
        assert_eq!(plugin.config().selected_style, "Mine");

        fs::remove_dir_all(fixture.user_root().join("Mine")).expect("remove");
        assert_eq!(plugin.reload_user_styles(), 0);
        assert_eq!(plugin.config().selected_style, "CleanCurves");
    }

    #[test]
    fn test_draw_frame() {
        let fixture = Fixture::new();
        let mut plugin = fixture.plugin();
        let host = FakeHost::new();
        let font = font();
        let ctx = Context::default();

        let mut outcome = None;
        let _ = ctx.run(RawInput::default(), |ctx| {
            outcome = Some(plugin.draw(ctx, host.services(), &font));
        });

        let outcome = outcome.expect("frame ran");
        let report = outcome.report().expect("drawn");
        assert_eq!(report.texts, vec!["50".to_string(), "80".to_string()]);
    }

    #[test]
    fn test_dispose() {
        let fixture = Fixture::new();
        let mut plugin = fixture.plugin();
        plugin.handle_command("/pside", "");

        plugin.dispose();
        assert!(plugin.is_disposed());
        assert!(!plugin.window().open);
        assert_eq!(plugin.styles().count(StyleKind::BuiltIn), 0);

        plugin.handle_command("/pside", "");
        assert!(!plugin.window().open);
        plugin.dispose();
    }
}
