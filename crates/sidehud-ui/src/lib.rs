//! # Side HUD UI
//!
//! Drawing side of the Side HUD overlay:
//! - Draw list seam and its egui implementation
//! - Glyph text rendering with rotated, flipped and outlined text
//! - Bar styles and their registry
//! - The per-frame HUD compositor
//! - The settings window

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod bar;
pub mod draw_list;
pub mod font;
pub mod hud;
pub mod settings_window;
pub mod style;
pub mod text;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bar::*;
    pub use crate::draw_list::*;
    pub use crate::font::*;
    pub use crate::hud::*;
    pub use crate::settings_window::*;
    pub use crate::style::*;
    pub use crate::text::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, Pos2, TextureId};

    #[test]
    fn test_outlined_text_through_prelude() {
        let font = BitmapFont::from_grid(TextureId::User(1), 12.0, 6.0, 4, 4, "0123456789");
        let mut list = RecordingDrawList::new();
        draw_outline_text(
            &mut list,
            &font,
            "42",
            1.0,
            Pos2::new(3.0, 3.0),
            Color32::WHITE,
            Color32::BLACK,
            hud::OUTLINE_THICKNESS,
            Orientation::Horizontal,
        );
        assert_eq!(list.quads.len(), 2 * (8 * 2 + 1));
    }
}
