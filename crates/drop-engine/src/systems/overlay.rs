//! Lyon-based overlay lines drawn on top of the world.
//!
//! Games redraw the overlay every frame (guidelines, threshold markers). Lines are
//! tessellated on the CPU into a flat triangle list that the host renders as-is.
//!
//! ```ignore
//! ctx.overlay.clear();
//! ctx.overlay.stroke_dashed_line(top, bottom, 5.0, 5.0, 1.0, OverlayColor::rgb8(0x99, 0x99, 0x99));
//! ctx.overlay.stroke_line(left, right, 2.0, OverlayColor::RED);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor,
    VertexBuffers,
};

/// Per-vertex data for overlay rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct OverlayVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl OverlayVertex {
    pub const FLOATS: usize = 6;
}

/// RGBA color for overlay drawing (0.0 - 1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl OverlayColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse a CSS hex color: `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Self::rgb8(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb8(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    /// Pack as `0xRRGGBB` for hosts that want a CSS color back.
    pub fn to_rgb24(self) -> u32 {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

impl Default for OverlayColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct StrokeVertexCtor {
    color: OverlayColor,
}

impl StrokeVertexConstructor<OverlayVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> OverlayVertex {
        OverlayVertex {
            x: vertex.position().x,
            y: vertex.position().y,
            r: self.color.r,
            g: self.color.g,
            b: self.color.b,
            a: self.color.a,
        }
    }
}

/// Overlay tessellation state and its flat output buffer.
pub struct OverlayState {
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<OverlayVertex, u32>,
    buffer: Vec<f32>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(1024 * OverlayVertex::FLOATS),
        }
    }

    /// Clear the vertex buffer. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / OverlayVertex::FLOATS
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Flush indexed geometry to the flat buffer as a triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// Stroke a solid straight line.
    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: OverlayColor) {
        if from == to || width <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(from.x, from.y));
        builder.line_to(point(to.x, to.y));
        builder.end(false);
        self.stroke_path(&builder.build(), width, color);
    }

    /// Stroke a dashed straight line: `dash` units drawn, `gap` units skipped, from `from`.
    pub fn stroke_dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        dash: f32,
        gap: f32,
        width: f32,
        color: OverlayColor,
    ) {
        let length = from.distance(to);
        if length <= 0.0 || width <= 0.0 {
            return;
        }
        if dash <= 0.0 || gap <= 0.0 {
            self.stroke_line(from, to, width, color);
            return;
        }

        let dir = (to - from) / length;
        let mut builder = Path::builder();
        let mut start = 0.0;
        while start < length {
            let end = (start + dash).min(length);
            let a = from + dir * start;
            let b = from + dir * end;
            builder.begin(point(a.x, a.y));
            builder.line_to(point(b.x, b.y));
            builder.end(false);
            start += dash + gap;
        }
        self.stroke_path(&builder.build(), width, color);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: OverlayColor) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.5).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );

        if result.is_ok() {
            self.flush_geometry();
        } else {
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        let grey = OverlayColor::from_hex("#999").unwrap();
        assert!((grey.r - 0.6).abs() < 0.01 && grey.r == grey.b);
        let flash = OverlayColor::from_hex("#ffcccc").unwrap();
        assert_eq!(flash.to_rgb24(), 0xffcccc);
        assert!(OverlayColor::from_hex("ffcccc").is_none());
        assert!(OverlayColor::from_hex("#12345").is_none());
        assert!(OverlayColor::from_hex("#zzz").is_none());
    }

    #[test]
    fn solid_line_is_a_triangle_list() {
        let mut overlay = OverlayState::new();
        overlay.stroke_line(Vec2::ZERO, Vec2::new(100.0, 0.0), 2.0, OverlayColor::RED);
        assert!(overlay.vertex_count() > 0);
        assert_eq!(overlay.vertex_count() % 3, 0);
    }

    #[test]
    fn dashed_line_emits_one_quad_per_dash() {
        let mut single = OverlayState::new();
        single.stroke_line(Vec2::new(50.0, 100.0), Vec2::new(50.0, 105.0), 1.0, OverlayColor::WHITE);

        let mut overlay = OverlayState::new();
        // 100 units with 5/5 dashes = 10 dashes
        overlay.stroke_dashed_line(
            Vec2::new(50.0, 100.0),
            Vec2::new(50.0, 200.0),
            5.0,
            5.0,
            1.0,
            OverlayColor::WHITE,
        );
        assert_eq!(overlay.vertex_count(), 10 * single.vertex_count());
    }

    #[test]
    fn degenerate_lines_are_skipped() {
        let mut overlay = OverlayState::new();
        overlay.stroke_line(Vec2::ONE, Vec2::ONE, 2.0, OverlayColor::RED);
        overlay.stroke_dashed_line(Vec2::ZERO, Vec2::X, 5.0, 5.0, 0.0, OverlayColor::RED);
        assert_eq!(overlay.vertex_count(), 0);
        overlay.stroke_line(Vec2::ZERO, Vec2::X * 10.0, 1.0, OverlayColor::RED);
        overlay.clear();
        assert_eq!(overlay.vertex_count(), 0);
    }
}
