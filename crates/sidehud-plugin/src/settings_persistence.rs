//! Settings persistence.
//!
//! The configuration lives in `~/.config/sidehud/settings.toml` (or under
//! `XDG_CONFIG_HOME`). It is loaded once at startup and written back whenever
//! the settings window reports a change.

use std::fs;
use std::path::{Path, PathBuf};

use sidehud_common::{HudError, SchemaVersion};
use sidehud_core::HudConfig;
use thiserror::Error;
use tracing::{info, warn};

/// Settings file name.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Settings directory under the user config directory.
pub const SETTINGS_DIR_NAME: &str = "sidehud";

/// Errors that can occur during settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    /// The file was written by an incompatible version.
    #[error("Unsupported settings version {found}, expected {}", SchemaVersion::HUD_CONFIG)]
    UnsupportedVersion {
        /// Version found in the file.
        found: SchemaVersion,
    },
}

impl From<SettingsError> for HudError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::Io(e) => HudError::Io(e),
            SettingsError::UnsupportedVersion { found } => HudError::VersionMismatch {
                expected: SchemaVersion::HUD_CONFIG.to_string(),
                actual: found.to_string(),
            },
            other => HudError::Settings(other.to_string()),
        }
    }
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Serializes a configuration to TOML.
pub fn config_to_toml(config: &HudConfig) -> SettingsResult<String> {
    let toml = toml::to_string_pretty(config)?;
    Ok(toml)
}

/// Parses a configuration from TOML, clamping out-of-range values.
///
/// Missing fields take their defaults; files from another major version are
/// rejected.
pub fn config_from_toml(toml: &str) -> SettingsResult<HudConfig> {
    let mut config: HudConfig = toml::from_str(toml)?;
    if !SchemaVersion::HUD_CONFIG.can_read(&config.version) {
        return Err(SettingsError::UnsupportedVersion {
            found: config.version,
        });
    }
    config.version = SchemaVersion::HUD_CONFIG;
    config.validate();
    Ok(config)
}

/// Owns the configuration and its file.
#[derive(Debug)]
pub struct SettingsManager {
    /// Current configuration.
    config: HudConfig,
    /// Path to the settings file.
    settings_path: PathBuf,
    /// Whether the configuration changed since the last save.
    dirty: bool,
    /// Save on change.
    auto_save: bool,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    /// Creates a manager with the default path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(Self::default_settings_path())
    }

    /// Creates a manager with a custom path.
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config: HudConfig::default(),
            settings_path: path.as_ref().to_path_buf(),
            dirty: false,
            auto_save: true,
        }
    }

    /// Returns the default settings path.
    #[must_use]
    pub fn default_settings_path() -> PathBuf {
        if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME") {
            if !config_dir.is_empty() {
                return PathBuf::from(config_dir)
                    .join(SETTINGS_DIR_NAME)
                    .join(SETTINGS_FILE_NAME);
            }
        }

        if let Some(home) = dirs::home_dir() {
            return home
                .join(".config")
                .join(SETTINGS_DIR_NAME)
                .join(SETTINGS_FILE_NAME);
        }

        PathBuf::from(SETTINGS_FILE_NAME)
    }

    /// Returns the settings path.
    #[must_use]
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    /// Returns the configuration for editing. Callers report edits through
    /// [`SettingsManager::mark_dirty`].
    pub fn config_mut(&mut self) -> &mut HudConfig {
        &mut self.config
    }

    /// Edits the configuration and marks it changed.
    pub fn update<R>(&mut self, edit: impl FnOnce(&mut HudConfig) -> R) -> R {
        self.dirty = true;
        edit(&mut self.config)
    }

    /// Flags the configuration as changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the configuration changed since the last save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sets auto-save on change.
    pub fn set_auto_save(&mut self, auto_save: bool) {
        self.auto_save = auto_save;
    }

    /// Loads the configuration. A missing file yields the defaults, flagged
    /// for saving.
    pub fn load(&mut self) -> SettingsResult<()> {
        if !self.settings_path.exists() {
            info!("Settings file not found, using defaults");
            self.config = HudConfig::default();
            self.dirty = true;
            return Ok(());
        }

        let contents = fs::read_to_string(&self.settings_path)?;
        self.config = config_from_toml(&contents)?;
        self.dirty = false;

        info!("Settings loaded from {:?}", self.settings_path);
        Ok(())
    }

    /// Loads the configuration, falling back to the defaults when the file
    /// cannot be used.
    pub fn load_or_default(&mut self) {
        if let Err(e) = self.load() {
            warn!("Could not load settings ({}), using defaults", e);
            self.reset_to_defaults();
        }
    }

    /// Writes the configuration.
    pub fn save(&mut self) -> SettingsResult<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml = config_to_toml(&self.config)?;
        fs::write(&self.settings_path, toml)?;
        self.dirty = false;

        info!("Settings saved to {:?}", self.settings_path);
        Ok(())
    }

    /// Saves if dirty and auto-save is enabled.
    pub fn auto_save_if_dirty(&mut self) -> SettingsResult<()> {
        if self.auto_save && self.dirty {
            self.save()?;
        }
        Ok(())
    }

    /// Resets the configuration to defaults.
    pub fn reset_to_defaults(&mut self) {
        self.config = HudConfig::default();
        self.dirty = true;
        info!("Settings reset to defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, SettingsManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = SettingsManager::with_path(dir.path().join("sidehud").join(SETTINGS_FILE_NAME));
        (dir, manager)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (_dir, mut manager) = manager();
        manager.load().expect("load");
        assert_eq!(manager.config(), &HudConfig::default());
        assert!(manager.is_dirty());
    }

    #[test]
    fn test_save_load() {
        let (_dir, mut manager) = manager();
        manager.update(|config| {
            config.flip_bars = true;
            config.bar_gap = 42.0;
            config.selected_style = "GlowArc".to_string();
        });
        manager.save().expect("save");
        assert!(!manager.is_dirty());

        let mut reloaded = SettingsManager::with_path(manager.settings_path());
        reloaded.load().expect("load");
        assert!(reloaded.config().flip_bars);
        assert_eq!(reloaded.config().bar_gap, 42.0);
        assert_eq!(reloaded.config().selected_style, "GlowArc");
        assert!(!reloaded.is_dirty());
    }

    #[test]
    fn test_load_clamps_values() {
        let config = config_from_toml("scale = 9.0\ntransparency = -5.0\n").expect("parse");
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.transparency, 0.0);
        assert!(config.show_numbers);
    }

    #[test]
    fn test_rejects_other_major_version() {
        let toml = "[version]\nmajor = 2\nminor = 0\npatch = 0\n";
        let err = config_from_toml(toml).expect_err("newer major");
        assert!(matches!(err, SettingsError::UnsupportedVersion { found } if found.major == 2));
        assert!(matches!(HudError::from(err), HudError::VersionMismatch { .. }));
    }

    #[test]
    fn test_older_minor_is_upgraded() {
        let toml = "[version]\nmajor = 1\nminor = 0\npatch = 0\n";
        let config = config_from_toml(toml).expect("same major");
        assert_eq!(config.version, SchemaVersion::HUD_CONFIG);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let (_dir, mut manager) = manager();
        let path = manager.settings_path().to_path_buf();
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "scale = [").expect("write");

        assert!(matches!(manager.load(), Err(SettingsError::TomlDeserialize(_))));
        manager.load_or_default();
        assert_eq!(manager.config(), &HudConfig::default());
        assert!(manager.is_dirty());
    }

    #[test]
    fn test_auto_save_only_when_dirty() {
        let (_dir, mut manager) = manager();
        manager.auto_save_if_dirty().expect("noop");
        assert!(!manager.settings_path().exists());

        manager.mark_dirty();
        manager.set_auto_save(false);
        manager.auto_save_if_dirty().expect("disabled");
        assert!(!manager.settings_path().exists());

        manager.set_auto_save(true);
        manager.auto_save_if_dirty().expect("save");
        assert!(manager.settings_path().exists());
    }

    #[test]
    fn test_config_mut_does_not_mark_dirty() {
        let (_dir, mut manager) = manager();
        manager.config_mut().hide_hud = true;
        assert!(!manager.is_dirty());
        manager.mark_dirty();
        assert!(manager.is_dirty());
    }
}
