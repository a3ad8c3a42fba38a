//! Preview of the queued piece: a circle-clipped thumbnail that follows the aim.

use drop_engine::DisplaySurface;

use crate::levels::Tier;

#[derive(Debug, Default)]
pub struct PreviewRenderer {
    /// Side the surface was last sized to; resizing clears a canvas, so skip it when unchanged.
    prev_side: u32,
    shown: Option<(Tier, f32)>,
    dirty: bool,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    /// Force a redraw on the next render, e.g. after a reset.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Draw `tier` centred on `x`. Does nothing when that exact preview is already shown.
    ///
    /// Returns whether a thumbnail was drawn. A sprite that is not available yet leaves
    /// the preview dirty so the next frame tries again.
    pub fn render(&mut self, surface: &mut dyn DisplaySurface, tier: Tier, x: f32) -> bool {
        if !self.dirty && self.shown == Some((tier, x)) {
            return false;
        }

        let radius = tier.radius();
        let side = tier.diameter().round() as u32;
        if side != self.prev_side {
            surface.resize(side);
            self.prev_side = side;
        }
        surface.set_left(x - radius);
        surface.clear();

        let drawn = surface.draw_clipped_circle(&tier.sprite_name(), radius);
        self.shown = Some((tier, x));
        self.dirty = !drawn;
        drawn
    }
}
