/// Index of a sprite image in the asset manifest's sprite table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteId(pub u32);

/// Sprite component. Defines how an entity appears visually.
///
/// Each sprite is a standalone square image; the renderer scales it to the
/// entity's world size.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    /// Which image to draw.
    pub id: SpriteId,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl SpriteComponent {
    pub fn new(id: SpriteId) -> Self {
        Self { id, alpha: 1.0 }
    }
}
