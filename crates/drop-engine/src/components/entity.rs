use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::sprite::SpriteComponent;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// Everything the engine knows about one object in the world.
///
/// Arena pieces (floor, walls) carry a body but no sprite and are never drawn.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Category label: "piece", "floor", "wall", ...
    pub tag: String,
    /// Centre in world space, synced from the physics body after every step.
    pub pos: Vec2,
    /// Radians.
    pub rotation: f32,
    /// Rendered side length in world units (diameter for round pieces).
    pub size: f32,
    pub sprite: Option<SpriteComponent>,
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            pos: Vec2::ZERO,
            rotation: 0.0,
            size: 1.0,
            sprite: None,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
