//! End-to-end sessions: real Rapier world, virtual clock, input queue.

use drop_engine::{EngineContext, Game, GameEvent, InputEvent, InputQueue};
use drop_web::GameRunner;
use glam::Vec2;
use merge_drop::game::{events, game_events, PIECE_TAG};
use merge_drop::levels::Tier;
use merge_drop::merge::TERMINAL_CUE;
use merge_drop::{MergeConfig, MergeDrop};

const FRAME_MS: f64 = 1000.0 / 60.0;

struct Harness {
    game: MergeDrop,
    ctx: EngineContext,
    input: InputQueue,
    events: Vec<GameEvent>,
    sounds: Vec<u32>,
}

impl Harness {
    fn new(config: MergeConfig) -> Self {
        let mut game = MergeDrop::with_config(config);
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx);
        let events = ctx.events.clone();
        Self {
            game,
            ctx,
            input: InputQueue::new(),
            events,
            sounds: Vec::new(),
        }
    }

    fn weightless() -> Self {
        Self::new(MergeConfig {
            gravity: 0.0,
            ..MergeConfig::default()
        })
    }

    /// One runner frame with exactly one fixed step.
    fn frame(&mut self) {
        self.ctx.clear_frame_data();
        self.ctx.clock.advance_ms(FRAME_MS);
        self.game.update(&mut self.ctx, &self.input);
        self.ctx.step_physics();
        self.input.clear();
        self.events.extend(self.ctx.events.iter().copied());
        self.sounds.extend(self.ctx.sounds.iter().map(|s| s.0));
    }

    fn run_ms(&mut self, ms: f64) {
        let frames = (ms / FRAME_MS).ceil() as usize;
        for _ in 0..frames {
            self.frame();
        }
    }

    fn spawn(&mut self, level: u8, x: f32, y: f32) {
        let tier = Tier::new(level).unwrap();
        self.game.spawn_piece(&mut self.ctx, tier, Vec2::new(x, y));
    }

    fn events_of(&self, kind: f32) -> Vec<GameEvent> {
        self.events.iter().copied().filter(|e| e.kind == kind).collect()
    }

    fn piece_tiers(&self) -> Vec<u8> {
        self.game.session().pieces().map(|p| p.tier().index()).collect()
    }
}

#[test]
fn init_builds_arena_and_announces_state() {
    let h = Harness::new(MergeConfig::default());
    assert_eq!(h.ctx.scene.len(), 3, "floor + two walls");
    assert_eq!(h.ctx.physics.body_count(), 3);

    let score = h.events_of(game_events::SCORE);
    assert_eq!(score, vec![GameEvent::new(game_events::SCORE, 0.0, 1.0, 0.0)]);
    let preview = h.events_of(game_events::PREVIEW);
    assert_eq!(preview.len(), 1);
    assert!(preview[0].a <= 5.0);
}

#[test]
fn host_sees_opening_score_and_preview_on_first_frame() {
    let mut runner = GameRunner::new(MergeDrop::new());
    runner.init();
    runner.tick(1.0 / 60.0);

    let kinds: Vec<f32> = runner.game_events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![game_events::SCORE, game_events::PREVIEW]);
    assert_eq!(runner.game_events()[0].a, 0.0);

    runner.tick(1.0 / 60.0);
    assert!(runner.game_events().is_empty());
}

#[test]
fn drop_spawns_piece_and_starts_cooldown() {
    let mut h = Harness::new(MergeConfig::default());
    h.input.push(InputEvent::PointerDown { x: 400.0, y: 300.0 });
    h.frame();

    assert_eq!(h.game.session().piece_count(), 1);
    assert_eq!(h.ctx.scene.find_all_by_tag(PIECE_TAG).len(), 1);
    assert_eq!(h.sounds, vec![0]);
    assert!(!h.game.session().can_drop);
    assert_eq!(h.events_of(game_events::PREVIEW).len(), 2, "next tier queued");

    // still cooling down
    h.input.push(InputEvent::PointerDown { x: 400.0, y: 300.0 });
    h.frame();
    assert_eq!(h.game.session().piece_count(), 1);
    assert_eq!(h.sounds, vec![0]);

    h.run_ms(500.0);
    assert!(h.game.session().can_drop);
}

#[test]
fn drops_inside_dead_zone_are_ignored() {
    let mut h = Harness::new(MergeConfig::default());
    let next = h.game.session().next_tier;
    h.input.push(InputEvent::PointerDown { x: 400.0, y: 99.0 });
    h.frame();

    assert_eq!(h.game.session().piece_count(), 0);
    assert!(h.game.session().can_drop);
    assert_eq!(h.game.session().next_tier, next);
    assert!(h.sounds.is_empty());
}

#[test]
fn pointer_moves_are_clamped_between_walls() {
    let mut h = Harness::new(MergeConfig::default());
    let r = h.game.session().next_tier.radius();
    h.input.push(InputEvent::PointerMove { x: -200.0, y: 300.0 });
    h.frame();
    assert_eq!(h.game.session().pointer_x, r);

    h.input.push(InputEvent::PointerMove { x: 5000.0, y: 300.0 });
    h.frame();
    assert_eq!(h.game.session().pointer_x, 800.0 - r);
}

#[test]
fn touching_same_tier_pieces_merge_at_midpoint() {
    let mut h = Harness::new(MergeConfig::default());
    // resting on the floor, overlapping by one unit
    h.spawn(0, 370.0, 570.0);
    h.spawn(0, 429.0, 570.0);

    h.run_ms(200.0);

    assert_eq!(h.piece_tiers(), vec![1]);
    assert_eq!(h.game.session().score(), 10);
    assert_eq!(h.sounds, vec![1]);
    assert_eq!(h.ctx.scene.find_all_by_tag(PIECE_TAG).len(), 1);

    let merged = h.game.session().pieces().next().unwrap().id;
    let pos = h.ctx.scene.get(merged).unwrap().pos;
    assert!((pos.x - 399.5).abs() < 2.0, "merged piece at x={}", pos.x);

    let score = h.events_of(game_events::SCORE);
    assert_eq!(score[1], GameEvent::new(game_events::SCORE, 10.0, 0.85, 0.0));
    assert_eq!(score.last().unwrap().b, 1.0, "pulse ends");
}

#[test]
fn different_tiers_do_not_merge() {
    let mut h = Harness::weightless();
    h.spawn(2, 300.0, 300.0);
    h.spawn(3, 409.0, 300.0);

    h.run_ms(200.0);

    assert_eq!(h.game.session().piece_count(), 2);
    assert_eq!(h.game.session().score(), 0);
}

#[test]
fn largest_pair_becomes_terminal_piece() {
    let mut h = Harness::new(MergeConfig::default());
    h.spawn(10, 200.0, 400.0);
    h.spawn(10, 599.0, 400.0);

    h.run_ms(200.0);

    assert_eq!(h.piece_tiers(), vec![11]);
    assert_eq!(h.game.session().score(), 110);
    assert_eq!(h.sounds, vec![TERMINAL_CUE]);
}

#[test]
fn settled_piece_above_fail_line_ends_the_session() {
    let mut h = Harness::weightless();
    // two touching pieces near the top settle on each other
    h.spawn(0, 300.0, 50.0);
    h.spawn(1, 369.0, 50.0);

    h.run_ms(800.0);

    let flash = h.events_of(game_events::FLASH);
    assert_eq!(flash.len(), 1);
    assert_eq!(flash[0].a, 0xffcccc as f32);
    let over = h.events_of(game_events::GAME_OVER);
    assert_eq!(over, vec![GameEvent::new(game_events::GAME_OVER, 0.0, 0.0, 0.0)]);

    // full reset
    assert_eq!(h.game.session().piece_count(), 0);
    assert_eq!(h.ctx.scene.len(), 3);
    assert_eq!(h.ctx.physics.body_count(), 3);
}

#[test]
fn falling_piece_near_top_never_fails() {
    let mut h = Harness::weightless();
    h.spawn(0, 400.0, 40.0);

    h.run_ms(1200.0);

    assert!(h.events_of(game_events::FLASH).is_empty());
    assert_eq!(h.game.session().piece_count(), 1);
}

#[test]
fn floor_settles_but_walls_do_not() {
    let mut h = Harness::weightless();
    h.spawn(0, 29.0, 300.0);
    h.spawn(0, 400.0, 571.0);

    h.run_ms(100.0);

    let settled: Vec<(f32, bool)> = h
        .game
        .session()
        .pieces()
        .map(|p| (h.ctx.scene.get(p.id).unwrap().pos.x, p.is_settled()))
        .collect();
    assert_eq!(settled.len(), 2);
    for (x, is_settled) in settled {
        assert_eq!(is_settled, x > 200.0, "piece at x={} settled={}", x, is_settled);
    }
}

#[test]
fn reset_event_clears_the_board() {
    let mut h = Harness::new(MergeConfig::default());
    h.input.push(InputEvent::PointerDown { x: 400.0, y: 300.0 });
    h.frame();
    assert_eq!(h.game.session().piece_count(), 1);

    h.input.push(InputEvent::Custom {
        kind: events::RESET,
        a: 0.0,
        b: 0.0,
        c: 0.0,
    });
    h.frame();

    assert_eq!(h.game.session().piece_count(), 0);
    assert!(h.game.session().can_drop);
    assert_eq!(h.ctx.physics.body_count(), 3);
    // only the fail scan requested by this frame is pending
    assert_eq!(h.game.pending_tasks(), 1);
}

#[test]
fn overlay_draws_guideline_and_fail_line() {
    let mut h = Harness::new(MergeConfig::default());
    h.ctx.overlay.clear();
    h.game.render(&mut h.ctx);
    assert!(h.ctx.overlay.vertex_count() > 0);
}
