//! Bar styles: sets of four images loaded from a directory.
//!
//! Built-in styles ship with the plugin under `Styles/`; user styles live in
//! subdirectories of a configurable path. A style is only installed once all
//! four of its images loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions, Vec2};
use sidehud_common::StyleError;
use sidehud_core::{HudConfig, DEFAULT_STYLE};
use tracing::{debug, error, info, warn};

/// Image files every style directory must contain, in load order.
pub const STYLE_IMAGE_FILES: [&str; 4] = ["Bar.png", "BarBG.png", "Cast.png", "CastBG.png"];

/// Styles bundled with the plugin.
pub const BUILT_IN_STYLES: [&str; 3] = ["CleanCurves", "GlowArc", "RivetBar"];

/// Directory under the plugin directory holding the built-in styles.
pub const STYLES_DIR: &str = "Styles";

/// One uploaded style image.
///
/// When the image owns its texture, dropping it frees the texture.
#[derive(Clone)]
pub struct StyleImage {
    /// Texture to sample.
    pub texture: TextureId,
    /// Size in pixels.
    pub size: Vec2,
    handle: Option<TextureHandle>,
}

impl StyleImage {
    /// An image referring to a texture owned elsewhere.
    #[must_use]
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            size,
            handle: None,
        }
    }

    /// An image owning an uploaded texture.
    #[must_use]
    pub fn from_handle(handle: TextureHandle) -> Self {
        Self {
            texture: handle.id(),
            size: handle.size_vec2(),
            handle: Some(handle),
        }
    }

    /// Whether the texture is released together with this image.
    #[must_use]
    pub fn owns_texture(&self) -> bool {
        self.handle.is_some()
    }
}

impl fmt::Debug for StyleImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleImage")
            .field("texture", &self.texture)
            .field("size", &self.size)
            .field("owned", &self.owns_texture())
            .finish()
    }
}

/// The four images of a style.
#[derive(Debug, Clone)]
pub struct Style {
    /// Directory name of the style.
    pub name: String,
    /// Bar fill.
    pub bar: StyleImage,
    /// Bar background.
    pub bar_background: StyleImage,
    /// Cast and shield fill.
    pub cast: StyleImage,
    /// Overlay drawn over the bar.
    pub cast_background: StyleImage,
}

/// Where a style comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Bundled with the plugin.
    BuiltIn,
    /// Loaded from the user style path.
    User,
}

impl StyleKind {
    /// Kind matching the configuration flag.
    #[must_use]
    pub const fn from_user_flag(is_user: bool) -> Self {
        if is_user {
            Self::User
        } else {
            Self::BuiltIn
        }
    }

    /// Value of the configuration flag for this kind.
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

/// Decodes and uploads one image.
pub trait ImageLoader {
    /// Loads the image at `path`.
    fn load(&mut self, path: &Path) -> Result<StyleImage, StyleError>;
}

/// Loader decoding with `image` and uploading through an egui context.
#[derive(Clone)]
pub struct EguiImageLoader {
    ctx: Context,
}

impl EguiImageLoader {
    /// Creates a loader uploading into `ctx`.
    #[must_use]
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl ImageLoader for EguiImageLoader {
    fn load(&mut self, path: &Path) -> Result<StyleImage, StyleError> {
        let decoded = image::open(path).map_err(|e| StyleError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let rgba = decoded.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

        let handle = self.ctx.load_texture(
            path.display().to_string(),
            color_image,
            TextureOptions::LINEAR,
        );
        debug!("Uploaded {} ({}x{})", path.display(), size[0], size[1]);
        Ok(StyleImage::from_handle(handle))
    }
}

/// Loads the four images of the style in `dir`.
///
/// Images loaded before a failure are dropped with the error, so nothing of
/// a partial style survives.
pub fn load_style(
    loader: &mut dyn ImageLoader,
    name: &str,
    dir: &Path,
) -> Result<Style, StyleError> {
    let mut images = Vec::with_capacity(STYLE_IMAGE_FILES.len());
    for file in STYLE_IMAGE_FILES {
        let path = dir.join(file);
        if !path.is_file() {
            return Err(StyleError::MissingImage { path });
        }
        images.push(loader.load(&path)?);
    }

    let mut images = images.into_iter();
    match (images.next(), images.next(), images.next(), images.next()) {
        (Some(bar), Some(bar_background), Some(cast), Some(cast_background)) => Ok(Style {
            name: name.to_string(),
            bar,
            bar_background,
            cast,
            cast_background,
        }),
        _ => Err(StyleError::LoadFailed {
            path: dir.to_path_buf(),
            reason: "incomplete image set".to_string(),
        }),
    }
}

/// Installed styles.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    built_in: BTreeMap<String, Style>,
    user: BTreeMap<String, Style>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding the built-in styles of a plugin installation.
    #[must_use]
    pub fn built_in_root(plugin_dir: &Path) -> PathBuf {
        plugin_dir.join(STYLES_DIR)
    }

    /// Loads every built-in style not yet installed. Failures are logged and
    /// leave the other styles alone. Returns how many styles were added.
    pub fn load_built_in(&mut self, loader: &mut dyn ImageLoader, plugin_dir: &Path) -> usize {
        let root = Self::built_in_root(plugin_dir);
        let mut added = 0;

        for name in BUILT_IN_STYLES {
            if self.built_in.contains_key(name) {
                continue;
            }
            match load_style(loader, name, &root.join(name)) {
                Ok(style) => {
                    info!("Loaded built-in style {}", name);
                    self.built_in.insert(name.to_string(), style);
                    added += 1;
                }
                Err(e) => error!("Failed to load built-in style {}: {}", name, e),
            }
        }

        added
    }

    /// Loads a style from every subdirectory of `root`, keyed by directory
    /// name. Names already installed are skipped.
    pub fn load_user_styles(
        &mut self,
        loader: &mut dyn ImageLoader,
        root: &Path,
    ) -> Result<usize, StyleError> {
        if root.as_os_str().is_empty() {
            debug!("No user style path configured");
            return Ok(0);
        }
        if !root.is_dir() {
            let e = StyleError::MissingDirectory {
                path: root.to_path_buf(),
            };
            error!("{}", e);
            return Err(e);
        }

        let entries = std::fs::read_dir(root).map_err(|e| StyleError::LoadFailed {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut added = 0;
        for dir in dirs {
            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if self.user.contains_key(&name) {
                debug!("User style {} already loaded", name);
                continue;
            }
            match load_style(loader, &name, &dir) {
                Ok(style) => {
                    info!("Loaded user style {}", name);
                    self.user.insert(name, style);
                    added += 1;
                }
                Err(e) => error!("Failed to load user style {}: {}", name, e),
            }
        }

        Ok(added)
    }

    /// Drops every user style and scans `root` again.
    pub fn reload_user_styles(
        &mut self,
        loader: &mut dyn ImageLoader,
        root: &Path,
    ) -> Result<usize, StyleError> {
        let dropped = self.user.len();
        self.user.clear();
        debug!("Dropped {} user styles", dropped);
        self.load_user_styles(loader, root)
    }

    /// Looks up an installed style.
    #[must_use]
    pub fn get(&self, name: &str, kind: StyleKind) -> Option<&Style> {
        match kind {
            StyleKind::BuiltIn => self.built_in.get(name),
            StyleKind::User => self.user.get(name),
        }
    }

    /// Looks up an installed style, failing when it is missing.
    pub fn select(&self, name: &str, kind: StyleKind) -> Result<&Style, StyleError> {
        self.get(name, kind)
            .ok_or_else(|| StyleError::NotInstalled(name.to_string()))
    }

    /// The style selected by the configuration, if installed.
    #[must_use]
    pub fn resolve(&self, config: &HudConfig) -> Option<&Style> {
        self.get(
            &config.selected_style,
            StyleKind::from_user_flag(config.is_user_style),
        )
    }

    /// Points the configuration at a built-in style when its selection is not
    /// installed. Returns whether the configuration changed.
    pub fn ensure_selection(&self, config: &mut HudConfig) -> bool {
        if self.resolve(config).is_some() {
            return false;
        }

        let fallback = if self.built_in.contains_key(DEFAULT_STYLE) {
            DEFAULT_STYLE.to_string()
        } else {
            self.built_in
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| DEFAULT_STYLE.to_string())
        };

        if config.selected_style == fallback && !config.is_user_style {
            return false;
        }

        warn!(
            "Style {} is not installed, falling back to {}",
            config.selected_style, fallback
        );
        config.selected_style = fallback;
        config.is_user_style = false;
        true
    }

    /// Installed styles of one kind, in name order.
    pub fn styles(&self, kind: StyleKind) -> impl Iterator<Item = &Style> {
        match kind {
            StyleKind::BuiltIn => self.built_in.values(),
            StyleKind::User => self.user.values(),
        }
    }

    /// Number of installed styles of one kind.
    #[must_use]
    pub fn count(&self, kind: StyleKind) -> usize {
        match kind {
            StyleKind::BuiltIn => self.built_in.len(),
            StyleKind::User => self.user.len(),
        }
    }

    /// Drops every style, releasing owned textures.
    pub fn clear(&mut self) {
        self.built_in.clear();
        self.user.clear();
    }
}
