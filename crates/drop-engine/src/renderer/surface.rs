//! Display surface contract for host-side thumbnails.
//!
//! The engine never touches pixels itself. A surface is a small square pixel
//! canvas owned by the host (a `<canvas>` in the browser, a recording fake in
//! tests) that supports circular clipping and image blits.

/// A square 2D pixel surface.
pub trait DisplaySurface {
    /// Current side length of the backing store, in pixels.
    fn side(&self) -> u32;

    /// Reallocate the backing store to `side × side` pixels.
    fn resize(&mut self, side: u32);

    /// Move the surface so that its left edge sits at `x` (page units).
    fn set_left(&mut self, x: f32);

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Draw the named sprite scaled to `2 × radius`, clipped to a circle of
    /// `radius` centred on the surface. Returns `false` (drawing nothing) when
    /// the sprite is missing or not loaded yet.
    fn draw_clipped_circle(&mut self, sprite: &str, radius: f32) -> bool;
}
