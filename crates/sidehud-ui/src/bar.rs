//! Bar slices: vertical portions of a style image.
//!
//! Every bar element is the same operation: take the band `[from, to]` of an
//! image's height and draw it where that band would sit in the full image.
//! Bars on the left side use the image rotated 180 degrees.

use egui::{Color32, Pos2, Rect};

use crate::draw_list::DrawList;
use crate::style::StyleImage;

/// Which side of the screen centre a bar sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarSide {
    /// Left of centre, image rotated 180 degrees.
    Left,
    /// Right of centre, image as authored.
    Right,
}

impl BarSide {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Draws the band `[from, to]` of `image`, measured from the top of the bar
/// as fractions of its height. Returns whether anything was drawn.
pub fn draw_bar_slice(
    list: &mut dyn DrawList,
    image: &StyleImage,
    side: BarSide,
    top_left: Pos2,
    scale: f32,
    from: f32,
    to: f32,
    color: Color32,
) -> bool {
    if !from.is_finite() || !to.is_finite() {
        return false;
    }
    let from = from.clamp(0.0, 1.0);
    let to = to.clamp(0.0, 1.0);
    if to <= from {
        return false;
    }

    let size = image.size * scale;
    let rect = Rect::from_min_max(
        Pos2::new(top_left.x, top_left.y + size.y * from),
        Pos2::new(top_left.x + size.x, top_left.y + size.y * to),
    );

    let (uv0, uv1) = match side {
        BarSide::Right => (Pos2::new(0.0, from), Pos2::new(1.0, to)),
        BarSide::Left => (Pos2::new(1.0, 1.0 - from), Pos2::new(0.0, 1.0 - to)),
    };

    list.add_image(image.texture, rect, uv0, uv1, color);
    true
}
