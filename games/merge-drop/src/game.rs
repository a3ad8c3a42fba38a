//! Merge-drop: pieces fall into a walled arena, same-tier pairs fuse into the next tier,
//! and a settled piece reaching above the fail line ends the session.

use glam::Vec2;
use drop_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, DisplaySurface, EngineContext, Entity, EntityId,
    Game, GameConfig, GameEvent, InputEvent, InputQueue, OverlayColor, Scheduler, SoundEvent,
};
use drop_web::HostInfo;

use crate::config::MergeConfig;
use crate::drop::DropController;
use crate::fail::FailMonitor;
use crate::levels::Tier;
use crate::merge::{merge_cue, merge_score, MergeEngine, PendingMerge};
use crate::piece::Piece;
use crate::preview::PreviewRenderer;
use crate::session::{Phase, Session};
use crate::spawn::SpawnSelector;

pub const PIECE_TAG: &str = "piece";
pub const FLOOR_TAG: &str = "floor";
pub const WALL_TAG: &str = "wall";

// Overlay
const GUIDE_COLOR: &str = "#999";
const GUIDE_DASH: f32 = 5.0;
const GUIDE_WIDTH: f32 = 1.0;
const FAIL_LINE_WIDTH: f32 = 2.0;

// Background colour the host flashes when the fail line is crossed
const FLASH_COLOR: &str = "#ffcccc";

/// Custom event kinds from the host page
pub mod events {
    pub const RESET: u32 = 1;
}

/// Game event kinds to the host page
pub mod game_events {
    /// a = score, b = display scale of the score text
    pub const SCORE: f32 = 1.0;
    /// a = queued tier, b = aim x, c = radius
    pub const PREVIEW: f32 = 2.0;
    /// a = background colour as 0xRRGGBB
    pub const FLASH: f32 = 3.0;
    /// a = final score. The session has already restarted; the host shows its
    /// notification and restores the background.
    pub const GAME_OVER: f32 = 4.0;
}

/// Sound cue ids (see also `merge::FIRST_MERGE_CUE` and `merge::TERMINAL_CUE`)
pub mod sounds {
    pub const DROP: u32 = 0;
}

/// Deferred work, fired by the scheduler against the virtual clock.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    EnableDrop,
    CompleteMerge(PendingMerge),
    FailScan,
    ScorePulseEnd,
    EndSession,
}

pub struct MergeDrop {
    config: MergeConfig,
    session: Session,
    spawner: SpawnSelector,
    drop: DropController,
    merges: MergeEngine,
    fail: FailMonitor,
    preview: PreviewRenderer,
    timers: Scheduler<Task>,
    guide_color: OverlayColor,
    fail_color: OverlayColor,
    flash_rgb: u32,
}

impl MergeDrop {
    pub fn new() -> Self {
        Self::with_config(MergeConfig::default())
    }

    /// Size the world to the browser viewport and seed spawns from the clock.
    pub fn from_host(host: &HostInfo) -> Self {
        Self::with_config(MergeConfig {
            world_width: host.viewport_width,
            world_height: host.viewport_height,
            seed: host.seed,
            ..MergeConfig::default()
        })
    }

    /// Build a game from `config`. An invalid config is logged and replaced by the defaults.
    pub fn with_config(config: MergeConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("merge-drop: {}; falling back to default config", err);
                MergeConfig::default()
            }
        };

        let mut spawner = SpawnSelector::seeded(config.seed);
        let session = Session::new(spawner.next(), config.world_width / 2.0);

        Self {
            drop: DropController::new(config.world_width, config.drop_dead_zone),
            fail: FailMonitor::new(config.fail_line_y()),
            merges: MergeEngine::new(),
            preview: PreviewRenderer::new(),
            timers: Scheduler::new(),
            guide_color: OverlayColor::from_hex(GUIDE_COLOR).unwrap_or(OverlayColor::WHITE),
            fail_color: OverlayColor::RED,
            flash_rgb: OverlayColor::from_hex(FLASH_COLOR)
                .map(OverlayColor::to_rgb24)
                .unwrap_or(0xffffff),
            session,
            spawner,
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Number of deferred tasks still waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Floor plus two walls just outside the left and right edges.
    fn build_arena(&self, ctx: &mut EngineContext) {
        let w = self.config.world_width;
        let h = self.config.world_height;
        let t = self.config.wall_thickness;
        let material = ColliderMaterial::default();

        let id = ctx.next_id();
        let floor = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: w / 2.0,
            half_height: t / 2.0,
        })
        .with_position(Vec2::new(w / 2.0, h + t / 2.0));
        ctx.spawn_with_body(Entity::new(id).with_tag(FLOOR_TAG), floor, material);

        for x in [-t / 2.0, w + t / 2.0] {
            let id = ctx.next_id();
            let wall = BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: t / 2.0,
                half_height: h / 2.0,
            })
            .with_position(Vec2::new(x, h / 2.0));
            ctx.spawn_with_body(Entity::new(id).with_tag(WALL_TAG), wall, material);
        }
    }

    /// Put a piece of `tier` into the world at `pos`, at rest.
    pub fn spawn_piece(&mut self, ctx: &mut EngineContext, tier: Tier, pos: Vec2) -> EntityId {
        let id = ctx.next_id();
        let mut entity = Entity::new(id)
            .with_tag(PIECE_TAG)
            .with_size(tier.diameter());
        match ctx.sprites.get_or(&tier.sprite_name(), &tier.fallback_sprite_name()) {
            Some(sprite) => entity = entity.with_sprite(sprite.clone()),
            None => log::debug!("no sprite for {} yet", tier.sprite_name()),
        }

        let desc = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: tier.radius(),
        })
        .with_position(pos)
        .with_ccd(true);
        ctx.spawn_with_body(entity, desc, ColliderMaterial::bouncy(self.config.restitution));
        self.session.add_piece(Piece::new(id, tier));
        id
    }

    /// Pieces spawned before the manifest arrived pick up their sprite once it is known.
    fn attach_missing_sprites(&self, ctx: &mut EngineContext) {
        let sprites = &ctx.sprites;
        if sprites.is_empty() {
            return;
        }
        for entity in ctx.scene.iter_mut().filter(|e| e.sprite.is_none()) {
            let Some(piece) = self.session.piece(entity.id) else {
                continue;
            };
            let tier = piece.tier();
            if let Some(sprite) = sprites.get_or(&tier.sprite_name(), &tier.fallback_sprite_name()) {
                entity.sprite = Some(sprite.clone());
            }
        }
    }

    fn publish_score(&self, ctx: &mut EngineContext, scale: f32) {
        ctx.emit_event(GameEvent::new(
            game_events::SCORE,
            self.session.score() as f32,
            scale,
            0.0,
        ));
    }

    fn publish_preview(&mut self, ctx: &mut EngineContext) {
        let tier = self.session.next_tier;
        ctx.emit_event(GameEvent::new(
            game_events::PREVIEW,
            f32::from(tier.index()),
            self.session.pointer_x,
            tier.radius(),
        ));
        self.preview.invalidate();
    }

    /// First contact with another piece or the floor settles a piece. Walls never do.
    fn settle_contacts(&mut self, ctx: &EngineContext) {
        for pair in ctx.collisions().iter().filter(|p| p.started) {
            for (me, other) in [(pair.entity_a, pair.entity_b), (pair.entity_b, pair.entity_a)] {
                let grounding = self.session.piece(other).is_some()
                    || ctx.scene.tag_of(other) == Some(FLOOR_TAG);
                if !grounding {
                    continue;
                }
                if let Some(piece) = self.session.piece_mut(me) {
                    piece.settle();
                }
            }
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, .. } => {
                if self.drop.aim(&mut self.session, x) {
                    self.publish_preview(ctx);
                }
            }
            InputEvent::PointerDown { x, y } => self.commit_drop(ctx, x, y),
            InputEvent::Custom { kind: events::RESET, .. } => self.reset(ctx),
            _ => {}
        }
    }

    fn commit_drop(&mut self, ctx: &mut EngineContext, x: f32, y: f32) {
        let Some(order) = self.drop.try_commit(&mut self.session, x, y) else {
            log::debug!("drop rejected at ({:.0}, {:.0})", x, y);
            return;
        };

        self.timers
            .schedule(ctx.now_ms(), self.config.drop_cooldown_ms, Task::EnableDrop);
        self.spawn_piece(ctx, order.tier, order.pos);

        self.session.next_tier = self.spawner.next();
        self.session.pointer_x = self.drop.clamp_x(self.session.pointer_x, self.session.next_tier);
        self.publish_preview(ctx);

        ctx.emit_sound(SoundEvent(sounds::DROP));
        log::debug!("dropped tier {} at x={:.0}", order.tier.index(), order.pos.x);
    }

    fn run_task(&mut self, ctx: &mut EngineContext, task: Task) {
        match task {
            Task::EnableDrop => self.session.can_drop = true,
            Task::CompleteMerge(pending) => self.complete_merge(ctx, pending),
            Task::FailScan => self.run_fail_scan(ctx),
            Task::ScorePulseEnd => self.publish_score(ctx, 1.0),
            Task::EndSession => self.end_session(ctx),
        }
    }

    fn complete_merge(&mut self, ctx: &mut EngineContext, pending: PendingMerge) {
        let now = ctx.now_ms();
        for id in [pending.a, pending.b] {
            match self.session.consume_piece(id) {
                Some(piece) => {
                    self.merges.forget(piece.id);
                    ctx.despawn(piece.id);
                }
                None => log::debug!("merge source {:?} was not claimed, left in place", id),
            }
        }

        self.spawn_piece(ctx, pending.tier, pending.midpoint);

        let score = self.session.add_score(merge_score(pending.tier));
        self.publish_score(ctx, self.config.score_pulse_scale);
        self.timers
            .schedule(now, self.config.score_pulse_ms, Task::ScorePulseEnd);

        let streak = self.session.record_merge(now, self.config.streak_window_ms);
        ctx.emit_sound(SoundEvent(merge_cue(pending.tier, streak)));
        self.merges.finish();

        log::info!(
            "merged into tier {} (score {}, streak {})",
            pending.tier.index(),
            score,
            streak
        );
    }

    fn run_fail_scan(&mut self, ctx: &mut EngineContext) {
        let scene = &ctx.scene;
        let failed = self.fail.scan(&self.session, |piece| {
            scene.get(piece.id).map(|e| e.pos.y - piece.tier().radius())
        });
        if !failed || self.session.phase != Phase::Playing {
            return;
        }

        self.session.phase = Phase::Failing;
        ctx.emit_event(GameEvent::new(game_events::FLASH, self.flash_rgb as f32, 0.0, 0.0));
        self.timers
            .schedule(ctx.now_ms(), self.config.game_over_delay_ms, Task::EndSession);
        log::info!("fail line crossed at score {}", self.session.score());
    }

    fn end_session(&mut self, ctx: &mut EngineContext) {
        let score = self.session.score();
        ctx.emit_event(GameEvent::new(game_events::GAME_OVER, score as f32, 0.0, 0.0));
        log::info!("game over, final score {}", score);
        self.reset(ctx);
    }

    /// Clear every piece and pending task and start a fresh session. The arena stays.
    pub fn reset(&mut self, ctx: &mut EngineContext) {
        let ids: Vec<EntityId> = self.session.pieces().map(|p| p.id).collect();
        for id in ids {
            ctx.despawn(id);
        }

        self.timers.clear();
        self.merges.clear();
        self.fail.reset();
        self.session = Session::new(self.spawner.next(), self.config.world_width / 2.0);

        self.publish_score(ctx, 1.0);
        self.publish_preview(ctx);
        log::info!("session reset");
    }
}

impl Default for MergeDrop {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MergeDrop {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: self.config.world_width,
            world_height: self.config.world_height,
            max_instances: 512,
            gravity: Vec2::new(0.0, self.config.gravity),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.build_arena(ctx);
        self.publish_score(ctx, 1.0);
        self.publish_preview(ctx);
        log::info!(
            "merge-drop ready: {}x{} world, first tier {}",
            self.config.world_width,
            self.config.world_height,
            self.session.next_tier.index()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        // Contacts reported by the previous physics step
        self.settle_contacts(ctx);
        self.merges.observe(ctx.collisions());

        let now = ctx.now_ms();
        while let Some(task) = self.timers.pop_due(now) {
            self.run_task(ctx, task);
        }

        for event in input.iter() {
            self.handle_input(ctx, *event);
        }

        let scene = &ctx.scene;
        if let Some(pending) = self
            .merges
            .try_begin(&mut self.session, |id| scene.get(id).map(|e| e.pos))
        {
            self.timers
                .schedule(now, self.config.merge_settle_ms, Task::CompleteMerge(pending));
        }

        if self.fail.request_scan() {
            self.timers
                .schedule(now, self.config.fail_scan_delay_ms, Task::FailScan);
        }
    }

    fn render(&mut self, ctx: &mut EngineContext) {
        self.attach_missing_sprites(ctx);

        let x = self.session.pointer_x;
        ctx.overlay.stroke_dashed_line(
            Vec2::new(x, self.drop.dead_zone()),
            Vec2::new(x, self.config.world_height),
            GUIDE_DASH,
            GUIDE_DASH,
            GUIDE_WIDTH,
            self.guide_color,
        );

        let fail_y = self.fail.fail_line_y();
        ctx.overlay.stroke_line(
            Vec2::new(0.0, fail_y),
            Vec2::new(self.config.world_width, fail_y),
            FAIL_LINE_WIDTH,
            self.fail_color,
        );
    }

    fn present(&mut self, surface: &mut dyn DisplaySurface) {
        self.preview
            .render(surface, self.session.next_tier, self.session.pointer_x);
    }
}
