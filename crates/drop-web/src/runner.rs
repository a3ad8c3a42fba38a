use drop_engine::{
    AssetManifest, EngineContext, FixedTimestep, Game, GameConfig, GameEvent, InputEvent,
    InputQueue, RenderBuffer,
};
use drop_engine::systems::render::build_render_buffer;

use crate::audio::AudioBank;
use crate::surface::CanvasSurface;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner through `export_game!`
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// What `Game::init` emitted has not been published yet.
    init_output_pending: bool,
    /// Flat buffer of sound event IDs for hosts that play audio themselves.
    sound_buffer: Vec<u8>,
    manifest: Option<AssetManifest>,
    audio: Option<AudioBank>,
    surface: Option<CanvasSurface>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);

        let render_buffer = RenderBuffer::with_capacity(config.max_instances);
        let sound_buffer = Vec::with_capacity(config.max_sounds);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            render_buffer,
            timestep,
            config,
            initialized: false,
            init_output_pending: false,
            sound_buffer,
            manifest: None,
            audio: None,
            surface: None,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.ctx.clear_frame_data();
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.init_output_pending = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Parse the asset manifest, install its sprite table and preload images and sounds.
    /// A malformed manifest is logged and leaves the previous assets in place.
    pub fn load_manifest(&mut self, json: &str) {
        let manifest = match AssetManifest::from_json(json) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::warn!("asset manifest rejected: {}", err);
                return;
            }
        };

        self.ctx.load_manifest(&manifest);
        let audio = AudioBank::from_manifest(&manifest);
        if let Some(surface) = self.surface.as_mut() {
            surface.preload(&manifest);
        }
        log::info!(
            "asset manifest loaded: {} sprites, {} sound cues",
            manifest.sprites.len(),
            audio.len()
        );
        self.audio = Some(audio);
        self.manifest = Some(manifest);
    }

    /// Attach the canvas with the given element id as the game's display surface.
    pub fn attach_surface(&mut self, element_id: &str) {
        let Some(mut surface) = CanvasSurface::from_element_id(element_id) else {
            return;
        };
        if let Some(manifest) = &self.manifest {
            surface.preload(manifest);
        }
        self.surface = Some(surface);
    }

    /// Run one frame tick: advance the clock, run fixed steps, build output buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data; init output rides along with the first frame
        if !std::mem::take(&mut self.init_output_pending) {
            self.ctx.clear_frame_data();
        }
        self.ctx.clock.advance_secs(dt);

        // Fixed timestep accumulation
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            #[cfg(feature = "physics")]
            self.ctx.step_physics();
            // Input belongs to the first step only; with zero steps it waits for the next frame.
            self.input.clear();
        }

        // Per-frame overlay geometry
        #[cfg(feature = "vectors")]
        self.ctx.overlay.clear();
        self.game.render(&mut self.ctx);

        // Build render buffer from entities
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);

        if let Some(surface) = self.surface.as_mut() {
            self.game.present(surface);
        }

        // Pack sound events into flat buffer and play what we can
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
            if let Some(audio) = &self.audio {
                audio.play(sound.0);
            }
        }
    }

    // ---- Pointer accessors for host-side reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    #[cfg(feature = "vectors")]
    pub fn overlay_ptr(&self) -> *const f32 {
        self.ctx.overlay.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn overlay_vertex_count(&self) -> u32 {
        self.ctx.overlay.vertex_count() as u32
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    /// Game events of the last frame, capped at `max_events`.
    pub fn game_events(&self) -> &[GameEvent] {
        let len = self.ctx.events.len().min(self.config.max_events);
        &self.ctx.events[..len]
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.game_events().as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.game_events().len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.config.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}
