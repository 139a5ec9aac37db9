//! Glyph text rendering.
//!
//! Text is laid out in a local frame where the pen moves along +x and lines
//! stack along +y, then mapped onto the screen by an [`Orientation`]. The
//! layout box always starts at the requested position, whatever the
//! orientation.

use egui::{Color32, Pos2, Vec2};

use crate::draw_list::DrawList;
use crate::font::{Glyph, GlyphFont};

/// Ring directions used for outlines.
const OUTLINE_DIRECTIONS: [(f32, f32); 8] = [
    (1.0, 1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// How laid-out text is placed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right, lines going down.
    #[default]
    Horizontal,
    /// Rotated 180 degrees.
    HorizontalFlipped,
    /// Bottom to top, lines going right.
    Vertical,
    /// Top to bottom, lines going left.
    VerticalFlipped,
}

impl Orientation {
    /// Picks the orientation for a pair of flags.
    #[must_use]
    pub const fn new(is_vertical: bool, is_flipped: bool) -> Self {
        match (is_vertical, is_flipped) {
            (false, false) => Self::Horizontal,
            (false, true) => Self::HorizontalFlipped,
            (true, false) => Self::Vertical,
            (true, true) => Self::VerticalFlipped,
        }
    }

    /// Whether the primary axis runs along screen y.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::VerticalFlipped)
    }

    /// Screen-space size of a layout box of `size`.
    #[must_use]
    pub fn screen_size(self, size: Vec2) -> Vec2 {
        if self.is_vertical() {
            Vec2::new(size.y, size.x)
        } else {
            size
        }
    }

    /// Maps a point of a layout box of `size` to its offset from the box's
    /// screen-space top-left corner.
    #[must_use]
    pub fn map(self, local: Vec2, size: Vec2) -> Vec2 {
        match self {
            Self::Horizontal => local,
            Self::HorizontalFlipped => size - local,
            Self::Vertical => Vec2::new(local.y, size.x - local.x),
            Self::VerticalFlipped => Vec2::new(size.y - local.y, local.x),
        }
    }
}

/// Advance of one character, zero when the font has no glyph for it.
fn advance(font: &dyn GlyphFont, c: char, scale: f32) -> f32 {
    font.glyph(c).map_or(0.0, |glyph| glyph.advance * scale)
}

/// Size of the layout box of `text`: the widest line by the line count times
/// the line height.
#[must_use]
pub fn measure_text(font: &dyn GlyphFont, text: &str, scale: f32) -> Vec2 {
    let mut width = 0.0_f32;
    let mut line = 0.0_f32;
    let mut lines = 1_usize;

    for c in text.chars() {
        match c {
            '\n' => {
                width = width.max(line);
                line = 0.0;
                lines += 1;
            }
            '\r' => {}
            _ => line += advance(font, c, scale),
        }
    }

    Vec2::new(
        width.max(line),
        font.font_size() * scale * lines as f32,
    )
}

/// Draws `text` with its layout box starting at `position`.
pub fn draw_text(
    list: &mut dyn DrawList,
    font: &dyn GlyphFont,
    text: &str,
    scale: f32,
    position: Pos2,
    color: Color32,
    orientation: Orientation,
) {
    let reserved = text.chars().count();
    if reserved == 0 {
        return;
    }

    let size = measure_text(font, text, scale);
    let line_height = font.font_size() * scale;

    list.prim_reserve(font.texture(), reserved * 6, reserved * 4);

    let mut drawn = 0;
    let mut pen = Vec2::ZERO;
    for c in text.chars() {
        match c {
            '\n' => {
                pen = Vec2::new(0.0, pen.y + line_height);
                continue;
            }
            '\r' => continue,
            _ => {}
        }

        let Some(glyph) = font.glyph(c) else {
            continue;
        };

        let (corners, uvs) = glyph_quad(glyph, pen, scale, size, position, orientation);
        list.prim_quad_uv(corners, uvs, color);
        drawn += 1;

        pen.x += glyph.advance * scale;
    }

    let unused = reserved - drawn;
    list.prim_unreserve(unused * 6, unused * 4);
}

fn glyph_quad(
    glyph: &Glyph,
    pen: Vec2,
    scale: f32,
    size: Vec2,
    position: Pos2,
    orientation: Orientation,
) -> ([Pos2; 4], [Pos2; 4]) {
    let local = [
        Vec2::new(glyph.x0, glyph.y0),
        Vec2::new(glyph.x1, glyph.y0),
        Vec2::new(glyph.x1, glyph.y1),
        Vec2::new(glyph.x0, glyph.y1),
    ];
    let corners = local.map(|corner| position + orientation.map(pen + corner * scale, size));
    let uvs = [
        Pos2::new(glyph.u0, glyph.v0),
        Pos2::new(glyph.u1, glyph.v0),
        Pos2::new(glyph.u1, glyph.v1),
        Pos2::new(glyph.u0, glyph.v1),
    ];
    (corners, uvs)
}

/// Draws `text` ringed by `thickness` layers of `outline_color`.
///
/// Rings are drawn from the outermost inwards, eight copies each, and the
/// text itself goes on top at `position`.
pub fn draw_outline_text(
    list: &mut dyn DrawList,
    font: &dyn GlyphFont,
    text: &str,
    scale: f32,
    position: Pos2,
    color: Color32,
    outline_color: Color32,
    thickness: u32,
    orientation: Orientation,
) {
    for ring in (1..=thickness).rev() {
        let distance = ring as f32;
        for (dx, dy) in OUTLINE_DIRECTIONS {
            let offset = Vec2::new(dx, dy) * distance;
            draw_text(
                list,
                font,
                text,
                scale,
                position - offset,
                outline_color,
                orientation,
            );
        }
    }

    draw_text(list, font, text, scale, position, color, orientation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::RecordingDrawList;
    use crate::font::BitmapFont;
    use egui::{Rect, TextureId};
    use proptest::prelude::*;

    const FONT_SIZE: f32 = 16.0;

    fn font() -> BitmapFont {
        BitmapFont::new(FONT_SIZE, TextureId::User(3))
            .with_glyph('a', Glyph::cell(8.0, FONT_SIZE, [0.0, 0.0], [0.25, 1.0]))
            .with_glyph('b', Glyph::cell(10.0, FONT_SIZE, [0.25, 0.0], [0.5, 1.0]))
            .with_glyph('c', Glyph::cell(6.5, FONT_SIZE, [0.5, 0.0], [0.75, 1.0]))
            .with_glyph(' ', Glyph::cell(4.0, FONT_SIZE, [0.75, 0.0], [1.0, 1.0]))
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    fn assert_rect_close(a: Rect, b: Rect) {
        assert_close(a.min.x, b.min.x);
        assert_close(a.min.y, b.min.y);
        assert_close(a.max.x, b.max.x);
        assert_close(a.max.y, b.max.y);
    }

    #[test]
    fn test_orientation_from_flags() {
        assert_eq!(Orientation::new(false, false), Orientation::Horizontal);
        assert_eq!(Orientation::new(false, true), Orientation::HorizontalFlipped);
        assert_eq!(Orientation::new(true, false), Orientation::Vertical);
        assert_eq!(Orientation::new(true, true), Orientation::VerticalFlipped);
    }

    #[test]
    fn test_measure_single_line() {
        let size = measure_text(&font(), "abc", 2.0);
        assert_eq!(size, Vec2::new((8.0 + 10.0 + 6.5) * 2.0, FONT_SIZE * 2.0));
    }

    #[test]
    fn test_measure_uses_widest_line() {
        let size = measure_text(&font(), "a\nbbb\nc", 1.0);
        assert_eq!(size, Vec2::new(30.0, FONT_SIZE * 3.0));
    }

    #[test]
    fn test_measure_skips_unmapped_and_carriage_return() {
        let size = measure_text(&font(), "a?\r", 1.0);
        assert_eq!(size, Vec2::new(8.0, FONT_SIZE));
    }

    #[test]
    fn test_draw_horizontal_quads() {
        let mut list = RecordingDrawList::new();
        draw_text(
            &mut list,
            &font(),
            "ab",
            1.0,
            Pos2::new(100.0, 50.0),
            Color32::WHITE,
            Orientation::Horizontal,
        );

        assert_eq!(list.quads.len(), 2);
        assert_eq!(list.quads[0].corners[0], Pos2::new(100.0, 50.0));
        assert_eq!(list.quads[1].corners[0], Pos2::new(108.0, 50.0));
        assert_eq!(list.quads[1].corners[2], Pos2::new(118.0, 66.0));
        assert_eq!(list.quads[1].uvs[0], Pos2::new(0.25, 0.0));
        assert_eq!(list.quads[0].texture, TextureId::User(3));
    }

    #[test]
    fn test_draw_newline_resets_pen() {
        let mut list = RecordingDrawList::new();
        draw_text(
            &mut list,
            &font(),
            "a\nb",
            1.0,
            Pos2::ZERO,
            Color32::WHITE,
            Orientation::Horizontal,
        );

        assert_eq!(list.quads[1].corners[0], Pos2::new(0.0, FONT_SIZE));
    }

    #[test]
    fn test_draw_flipped_reverses_glyphs() {
        let mut list = RecordingDrawList::new();
        draw_text(
            &mut list,
            &font(),
            "ab",
            1.0,
            Pos2::ZERO,
            Color32::WHITE,
            Orientation::HorizontalFlipped,
        );

        // First glyph ends up on the right, upside down.
        assert_eq!(list.quads[0].corners[0], Pos2::new(18.0, FONT_SIZE));
        assert_eq!(list.quads[0].corners[2], Pos2::new(10.0, 0.0));
    }

    #[test]
    fn test_draw_vertical_rotates_box() {
        let mut list = RecordingDrawList::new();
        draw_text(
            &mut list,
            &font(),
            "ab",
            1.0,
            Pos2::new(5.0, 5.0),
            Color32::WHITE,
            Orientation::Vertical,
        );

        let bounds = list.bounds().expect("drawn");
        assert_eq!(bounds.size(), Vec2::new(FONT_SIZE, 18.0));
        assert_eq!(bounds.min, Pos2::new(5.0, 5.0));
        // Reading bottom to top: the first glyph sits at the bottom.
        assert_eq!(list.quads[0].bounds().max.y, 23.0);
    }

    #[test]
    fn test_reserve_returns_unused() {
        let mut list = RecordingDrawList::new();
        draw_text(
            &mut list,
            &font(),
            "a\n?b",
            1.0,
            Pos2::ZERO,
            Color32::WHITE,
            Orientation::Horizontal,
        );

        assert_eq!(list.reserved_vertices, 16);
        assert_eq!(list.unreserved_vertices, 8);
        assert_eq!(list.quads.len(), 2);
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut list = RecordingDrawList::new();
        draw_text(
            &mut list,
            &font(),
            "",
            1.0,
            Pos2::ZERO,
            Color32::WHITE,
            Orientation::Horizontal,
        );
        assert!(list.quads.is_empty());
        assert_eq!(list.reserved_vertices, 0);
    }

    #[test]
    fn test_outline_draw_order() {
        let mut list = RecordingDrawList::new();
        draw_outline_text(
            &mut list,
            &font(),
            "a",
            1.0,
            Pos2::new(10.0, 10.0),
            Color32::WHITE,
            Color32::BLACK,
            2,
            Orientation::Horizontal,
        );

        assert_eq!(list.quads.len(), 17);
        assert_eq!(list.quads[0].corners[0], Pos2::new(8.0, 8.0));
        assert_eq!(list.quads[8].corners[0], Pos2::new(9.0, 9.0));
        assert!(list.quads[..16].iter().all(|q| q.color == Color32::BLACK));

        let last = list.quads[16];
        assert_eq!(last.color, Color32::WHITE);
        assert_eq!(last.corners[0], Pos2::new(10.0, 10.0));
    }

    #[test]
    fn test_outline_zero_thickness_is_plain_text() {
        let mut list = RecordingDrawList::new();
        draw_outline_text(
            &mut list,
            &font(),
            "ab",
            1.0,
            Pos2::ZERO,
            Color32::WHITE,
            Color32::BLACK,
            0,
            Orientation::Horizontal,
        );
        assert_eq!(list.quads.len(), 2);
    }

    fn orientation_strategy() -> impl Strategy<Value = Orientation> {
        prop_oneof![
            Just(Orientation::Horizontal),
            Just(Orientation::HorizontalFlipped),
            Just(Orientation::Vertical),
            Just(Orientation::VerticalFlipped),
        ]
    }

    proptest! {
        #[test]
        fn prop_single_line_measure(text in "[abc ]{0,24}", scale in 0.25f32..2.0) {
            let font = font();
            let size = measure_text(&font, &text, scale);
            let advances: f32 = text.chars().map(|c| advance(&font, c, scale)).sum();

            prop_assert!((size.x - advances).abs() < 1e-3);
            prop_assert_eq!(size.y, FONT_SIZE * scale);
        }

        #[test]
        fn prop_measure_matches_drawn_bounds(
            text in "[abc]{1,8}(\n[abc]{1,8}){0,3}",
            scale in 0.25f32..2.0,
            x in -500f32..500.0,
            y in -500f32..500.0,
            orientation in orientation_strategy(),
        ) {
            let font = font();
            let position = Pos2::new(x, y);
            let mut list = RecordingDrawList::new();
            draw_text(&mut list, &font, &text, scale, position, Color32::WHITE, orientation);

            let size = orientation.screen_size(measure_text(&font, &text, scale));
            let bounds = list.bounds().expect("text has glyphs");
            assert_rect_close(bounds, Rect::from_min_size(position, size));
            prop_assert!(!list.has_non_finite());
        }
    }
}
