pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::entity::Entity;
pub use components::sprite::{SpriteComponent, SpriteId};
pub use core::scene::Scene;
pub use core::schedule::{Scheduler, TaskId};
pub use core::time::{Clock, FixedTimestep};
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use renderer::surface::DisplaySurface;
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::AssetManifest;
pub use assets::registry::SpriteRegistry;
pub use systems::render::build_render_buffer;

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
};

#[cfg(feature = "vectors")]
pub use systems::overlay::{OverlayState, OverlayVertex, OverlayColor};
