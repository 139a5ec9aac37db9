//! Glyph metrics consumed by the text renderer.
//!
//! Fonts are rasterised by the host. The HUD only needs, per character, the
//! pen advance and where the glyph sits in the atlas, which is what
//! [`GlyphFont`] exposes.

use std::collections::HashMap;

use egui::TextureId;

/// Metrics and atlas location of one glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Horizontal pen advance at scale 1.
    pub advance: f32,
    /// Left edge offset from the pen.
    pub x0: f32,
    /// Top edge offset from the line top.
    pub y0: f32,
    /// Right edge offset from the pen.
    pub x1: f32,
    /// Bottom edge offset from the line top.
    pub y1: f32,
    /// Atlas left.
    pub u0: f32,
    /// Atlas top.
    pub v0: f32,
    /// Atlas right.
    pub u1: f32,
    /// Atlas bottom.
    pub v1: f32,
}

impl Glyph {
    /// A glyph filling its whole advance cell of height `line_height`.
    #[must_use]
    pub fn cell(advance: f32, line_height: f32, uv_min: [f32; 2], uv_max: [f32; 2]) -> Self {
        Self {
            advance,
            x0: 0.0,
            y0: 0.0,
            x1: advance,
            y1: line_height,
            u0: uv_min[0],
            v0: uv_min[1],
            u1: uv_max[0],
            v1: uv_max[1],
        }
    }
}

/// A font whose glyphs live in one atlas texture.
pub trait GlyphFont {
    /// Line height at scale 1.
    fn font_size(&self) -> f32;

    /// Atlas texture.
    fn texture(&self) -> TextureId;

    /// Glyph for a character, or `None` when the font has no mapping.
    fn glyph(&self, c: char) -> Option<&Glyph>;
}

/// A font described by an explicit glyph table.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    font_size: f32,
    texture: TextureId,
    glyphs: HashMap<char, Glyph>,
}

impl BitmapFont {
    /// Creates a font without glyphs.
    #[must_use]
    pub fn new(font_size: f32, texture: TextureId) -> Self {
        Self {
            font_size,
            texture,
            glyphs: HashMap::new(),
        }
    }

    /// Adds or replaces a glyph.
    pub fn insert(&mut self, c: char, glyph: Glyph) {
        self.glyphs.insert(c, glyph);
    }

    /// Builder form of [`BitmapFont::insert`].
    #[must_use]
    pub fn with_glyph(mut self, c: char, glyph: Glyph) -> Self {
        self.insert(c, glyph);
        self
    }

    /// Builds a font from an atlas laid out as a grid of equal cells, filled
    /// row by row with `chars`. Every glyph covers its whole cell and
    /// advances by `advance`.
    #[must_use]
    pub fn from_grid(
        texture: TextureId,
        font_size: f32,
        advance: f32,
        columns: usize,
        rows: usize,
        chars: &str,
    ) -> Self {
        let mut font = Self::new(font_size, texture);
        if columns == 0 || rows == 0 {
            return font;
        }

        let cell_u = 1.0 / columns as f32;
        let cell_v = 1.0 / rows as f32;
        for (index, c) in chars.chars().enumerate().take(columns * rows) {
            let u = (index % columns) as f32 * cell_u;
            let v = (index / columns) as f32 * cell_v;
            font.insert(
                c,
                Glyph::cell(advance, font_size, [u, v], [u + cell_u, v + cell_v]),
            );
        }
        font
    }

    /// Number of mapped characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no character is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphFont for BitmapFont {
    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn texture(&self) -> TextureId {
        self.texture
    }

    fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_uvs() {
        let font = BitmapFont::from_grid(TextureId::User(1), 16.0, 8.0, 4, 2, "0123456");
        assert_eq!(font.len(), 7);

        let five = font.glyph('5').expect("mapped");
        assert_eq!((five.u0, five.v0), (0.25, 0.5));
        assert_eq!((five.u1, five.v1), (0.5, 1.0));
        assert_eq!(five.advance, 8.0);
        assert!(font.glyph('7').is_none());
    }

    #[test]
    fn test_from_grid_truncates_to_cells() {
        let font = BitmapFont::from_grid(TextureId::User(1), 16.0, 8.0, 2, 1, "abc");
        assert_eq!(font.len(), 2);
        assert!(font.glyph('c').is_none());
    }

    #[test]
    fn test_from_grid_empty_layout() {
        let font = BitmapFont::from_grid(TextureId::User(1), 16.0, 8.0, 0, 3, "abc");
        assert!(font.is_empty());
    }
}
