//! Textured quad emission into the host draw list.
//!
//! The HUD never goes through egui widgets for its bars or text; it emits
//! quads directly so glyphs can be rotated and flipped. [`DrawList`] is the
//! primitive it needs: reserve space, emit textured quads, give back what was
//! not used.

use egui::epaint::Vertex;
use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, TextureId};
use sidehud_common::Rgba;

/// Sink for textured quads.
pub trait DrawList {
    /// Starts a batch on `texture` and reserves room for the given number of
    /// indices and vertices.
    fn prim_reserve(&mut self, texture: TextureId, index_count: usize, vertex_count: usize);

    /// Emits one quad. Corners and UVs run clockwise from the first corner;
    /// the quad is split along the first/third corner diagonal.
    fn prim_quad_uv(&mut self, corners: [Pos2; 4], uvs: [Pos2; 4], color: Color32);

    /// Returns reserved capacity that was not used.
    fn prim_unreserve(&mut self, index_count: usize, vertex_count: usize);

    /// Draws an image stretched over `rect`. `uv0` maps to the top-left
    /// corner and `uv1` to the bottom-right one; swapping components flips
    /// the image.
    fn add_image(&mut self, texture: TextureId, rect: Rect, uv0: Pos2, uv1: Pos2, color: Color32) {
        self.prim_reserve(texture, 6, 4);
        self.prim_quad_uv(
            [
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
            ],
            [
                uv0,
                Pos2::new(uv1.x, uv0.y),
                uv1,
                Pos2::new(uv0.x, uv1.y),
            ],
            color,
        );
    }
}

/// Converts a straight-alpha color into an egui color.
#[must_use]
pub fn to_color32(color: Rgba) -> Color32 {
    let [r, g, b, a] = color.to_u8_array();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Draw list batching quads into egui meshes, one mesh per texture run.
#[derive(Debug, Default)]
pub struct EguiDrawList {
    meshes: Vec<Mesh>,
}

impl EguiDrawList {
    /// Creates an empty draw list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mesh_for(&mut self, texture: TextureId) -> &mut Mesh {
        let needs_new = self
            .meshes
            .last()
            .map_or(true, |mesh| mesh.texture_id != texture);
        if needs_new {
            self.meshes.push(Mesh::with_texture(texture));
        }
        let index = self.meshes.len() - 1;
        &mut self.meshes[index]
    }

    /// Number of quads emitted so far.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len() / 4).sum()
    }

    /// Consumes the list and returns one shape per non-empty mesh.
    #[must_use]
    pub fn into_shapes(self) -> Vec<Shape> {
        self.meshes
            .into_iter()
            .filter(|mesh| !mesh.is_empty())
            .map(Shape::mesh)
            .collect()
    }

    /// Consumes the list and paints it.
    pub fn paint(self, painter: &Painter) {
        for shape in self.into_shapes() {
            painter.add(shape);
        }
    }
}

impl DrawList for EguiDrawList {
    fn prim_reserve(&mut self, texture: TextureId, index_count: usize, vertex_count: usize) {
        let mesh = self.mesh_for(texture);
        mesh.indices.reserve(index_count);
        mesh.vertices.reserve(vertex_count);
    }

    fn prim_quad_uv(&mut self, corners: [Pos2; 4], uvs: [Pos2; 4], color: Color32) {
        let texture = self
            .meshes
            .last()
            .map_or(TextureId::default(), |mesh| mesh.texture_id);
        let mesh = self.mesh_for(texture);

        let base = mesh.vertices.len() as u32;
        for (pos, uv) in corners.into_iter().zip(uvs) {
            mesh.vertices.push(Vertex { pos, uv, color });
        }
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }

    fn prim_unreserve(&mut self, index_count: usize, vertex_count: usize) {
        if let Some(mesh) = self.meshes.last_mut() {
            let indices = mesh.indices.capacity().saturating_sub(index_count);
            let vertices = mesh.vertices.capacity().saturating_sub(vertex_count);
            mesh.indices.shrink_to(indices);
            mesh.vertices.shrink_to(vertices);
        }
    }
}

/// A quad captured by [`RecordingDrawList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedQuad {
    /// Texture bound when the quad was emitted.
    pub texture: TextureId,
    /// Screen-space corners.
    pub corners: [Pos2; 4],
    /// Texture coordinates.
    pub uvs: [Pos2; 4],
    /// Tint.
    pub color: Color32,
}

impl RecordedQuad {
    /// Axis-aligned bounds of the corners.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.corners)
    }
}

/// Draw list that records quads instead of drawing them.
///
/// Used for layout inspection and by tests.
#[derive(Debug, Default)]
pub struct RecordingDrawList {
    texture: TextureId,
    /// Captured quads in emission order.
    pub quads: Vec<RecordedQuad>,
    /// Total vertices reserved.
    pub reserved_vertices: usize,
    /// Total vertices given back.
    pub unreserved_vertices: usize,
}

impl RecordingDrawList {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quads emitted with a texture.
    pub fn quads_with(&self, texture: TextureId) -> impl Iterator<Item = &RecordedQuad> {
        self.quads.iter().filter(move |quad| quad.texture == texture)
    }

    /// Bounds covering every recorded quad, or `None` when nothing was drawn.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.quads
            .iter()
            .map(RecordedQuad::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Whether any recorded corner is NaN or infinite.
    #[must_use]
    pub fn has_non_finite(&self) -> bool {
        self.quads
            .iter()
            .flat_map(|quad| quad.corners.iter().chain(quad.uvs.iter()))
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
    }
}

impl DrawList for RecordingDrawList {
    fn prim_reserve(&mut self, texture: TextureId, _index_count: usize, vertex_count: usize) {
        self.texture = texture;
        self.reserved_vertices += vertex_count;
    }

    fn prim_quad_uv(&mut self, corners: [Pos2; 4], uvs: [Pos2; 4], color: Color32) {
        self.quads.push(RecordedQuad {
            texture: self.texture,
            corners,
            uvs,
            color,
        });
    }

    fn prim_unreserve(&mut self, _index_count: usize, vertex_count: usize) {
        self.unreserved_vertices += vertex_count;
    }
}
