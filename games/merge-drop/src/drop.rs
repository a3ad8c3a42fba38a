//! Drop controller: aiming and committing drops.

use glam::Vec2;

use crate::levels::Tier;
use crate::session::{Phase, Session};

/// An accepted drop, ready to be spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropOrder {
    pub tier: Tier,
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct DropController {
    world_width: f32,
    dead_zone: f32,
}

impl DropController {
    pub fn new(world_width: f32, dead_zone: f32) -> Self {
        Self {
            world_width,
            dead_zone,
        }
    }

    /// Keep a piece of `tier` fully between the walls.
    pub fn clamp_x(&self, x: f32, tier: Tier) -> f32 {
        let r = tier.radius();
        if self.world_width <= 2.0 * r {
            return self.world_width / 2.0;
        }
        if x.is_nan() {
            return self.world_width / 2.0;
        }
        x.clamp(r, self.world_width - r)
    }

    /// Move the aim. Returns whether the aim position changed.
    pub fn aim(&self, session: &mut Session, x: f32) -> bool {
        let clamped = self.clamp_x(x, session.next_tier);
        let changed = clamped != session.pointer_x;
        session.pointer_x = clamped;
        changed
    }

    /// Try to commit a drop at the pointer position `(x, y)`.
    ///
    /// Rejected (session untouched) while the cooldown is active, while the session is
    /// ending, or when `y` lies inside the top dead zone. On acceptance the aim moves to
    /// `x`, dropping is disabled and the queued tier is handed out; the caller re-enables
    /// dropping after the cooldown and queues the next tier.
    pub fn try_commit(&self, session: &mut Session, x: f32, y: f32) -> Option<DropOrder> {
        if !session.can_drop || session.phase != Phase::Playing || y < self.dead_zone {
            return None;
        }

        let tier = session.next_tier;
        session.pointer_x = self.clamp_x(x, tier);
        session.can_drop = false;
        Some(DropOrder {
            tier,
            pos: Vec2::new(session.pointer_x, 0.0),
        })
    }

    pub fn dead_zone(&self) -> f32 {
        self.dead_zone
    }
}
