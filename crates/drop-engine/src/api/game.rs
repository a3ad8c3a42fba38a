use crate::core::scene::Scene;
use crate::core::time::Clock;
use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::input::queue::InputQueue;
use crate::renderer::surface::DisplaySurface;
use crate::assets::manifest::AssetManifest;
use crate::assets::registry::SpriteRegistry;
#[cfg(feature = "physics")]
use crate::core::physics::{
    PhysicsWorld, BodyDesc, ColliderMaterial, CollisionPair,
};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "vectors")]
use crate::systems::overlay::OverlayState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of render instances (default: 256).
    pub max_instances: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (no gravity).
    /// Y points down, so positive Y falls toward the floor.
    #[cfg(feature = "physics")]
    pub gravity: glam::Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 256,
            max_sounds: 32,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: glam::Vec2::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One simulation tick: consume input, run due timers, react to the last step's contacts.
    /// The runner steps physics right after this returns.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional once-per-frame pass after all fixed steps (overlay lines, HUD geometry).
    fn render(&mut self, _ctx: &mut EngineContext) {}

    /// Optional pass that paints host-owned surfaces (thumbnails, previews).
    fn present(&mut self, _surface: &mut dyn DisplaySurface) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    pub clock: Clock,
    pub sprites: SpriteRegistry,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
    #[cfg(feature = "vectors")]
    pub overlay: OverlayState,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create an EngineContext configured from a game's `GameConfig`.
    pub fn from_config(config: &GameConfig) -> Self {
        #[cfg(not(feature = "physics"))]
        let _ = config;
        Self {
            scene: Scene::new(),
            sounds: Vec::new(),
            events: Vec::new(),
            clock: Clock::new(),
            sprites: SpriteRegistry::new(),
            next_id: 1,
            #[cfg(feature = "physics")]
            physics: PhysicsWorld::new(config.gravity, config.fixed_dt),
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
            #[cfg(feature = "vectors")]
            overlay: OverlayState::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Install the sprite table from a parsed asset manifest.
    pub fn load_manifest(&mut self, manifest: &AssetManifest) {
        self.sprites = SpriteRegistry::from_manifest(manifest);
    }

    /// Emit a sound cue to be played by the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    /// Collision events are replaced on every physics step instead.
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    /// Returns whether the entity existed.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            None => false,
        }
    }

    /// Contact notifications from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the game runner after `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some((pos, rot)) = entity.body.as_ref().and_then(|b| self.physics.pose(b)) {
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
