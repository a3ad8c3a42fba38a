//! Merge engine: pairs same-tier pieces in contact and fuses them into the next tier.
//!
//! Contact-begin notifications feed a live contact set. At most one merge is in flight:
//! claiming a pair flips both pieces to `Merging` on the spot, so duplicate or later
//! notifications for either piece are inert. Pairs that qualify while a merge is in
//! flight stay in the contact set and are picked up on a later step.

use std::collections::BTreeSet;

use drop_engine::{CollisionPair, EntityId};
use glam::Vec2;

use crate::levels::Tier;
use crate::session::Session;

/// Cue played when a merge produces the terminal tier.
pub const TERMINAL_CUE: u32 = 9;
/// First of the streak-indexed merge cues.
pub const FIRST_MERGE_CUE: u32 = 1;
/// Number of streak-indexed merge cues.
pub const MERGE_CUE_COUNT: u32 = 8;

/// A claimed pair waiting for its settle delay to run out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMerge {
    pub a: EntityId,
    pub b: EntityId,
    /// Tier of the replacement piece.
    pub tier: Tier,
    /// Midpoint of the two sources when the pair was claimed.
    pub midpoint: Vec2,
}

/// Points for producing a piece of `tier`.
pub fn merge_score(tier: Tier) -> u32 {
    u32::from(tier.index()) * 10
}

/// Sound cue for a merge producing `tier` at the given streak.
pub fn merge_cue(tier: Tier, streak: u32) -> u32 {
    if tier.is_terminal() {
        TERMINAL_CUE
    } else {
        FIRST_MERGE_CUE + streak.min(MERGE_CUE_COUNT - 1)
    }
}

#[derive(Debug, Default)]
pub struct MergeEngine {
    contacts: BTreeSet<(EntityId, EntityId)>,
    in_flight: bool,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one physics step's contact notifications into the live contact set.
    pub fn observe(&mut self, collisions: &[CollisionPair]) {
        for pair in collisions {
            if pair.started {
                self.contacts.insert(pair.key());
            } else {
                self.contacts.remove(&pair.key());
            }
        }
    }

    /// Drop every contact involving `id` (the entity left the world).
    pub fn forget(&mut self, id: EntityId) {
        self.contacts.retain(|(a, b)| *a != id && *b != id);
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Claim the first qualifying pair, in contact order, unless a merge is already in flight.
    ///
    /// `position` resolves a piece's current centre; pairs with an unknown position are skipped.
    pub fn try_begin(
        &mut self,
        session: &mut Session,
        position: impl Fn(EntityId) -> Option<Vec2>,
    ) -> Option<PendingMerge> {
        if self.in_flight {
            return None;
        }

        let (a, b, tier, midpoint) = self.contacts.iter().find_map(|&(a, b)| {
            let (pa, pb) = (session.piece(a)?, session.piece(b)?);
            if pa.tier() != pb.tier() || !pa.can_merge() || !pb.can_merge() {
                return None;
            }
            let tier = pa.tier().next()?;
            let midpoint = (position(a)? + position(b)?) / 2.0;
            Some((a, b, tier, midpoint))
        })?;

        for id in [a, b] {
            if let Some(piece) = session.piece_mut(id) {
                piece.claim();
            }
        }
        self.in_flight = true;
        Some(PendingMerge { a, b, tier, midpoint })
    }

    /// Release the in-flight guard once a pending merge has been resolved.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Forget all contacts and any in-flight merge.
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{MergeState, Piece};
    use proptest::prelude::*;

    fn started(a: u32, b: u32) -> CollisionPair {
        CollisionPair {
            entity_a: EntityId(a),
            entity_b: EntityId(b),
            started: true,
        }
    }

    fn session_with(pieces: &[(u32, u8)]) -> Session {
        let mut session = Session::new(Tier::SMALLEST, 0.0);
        for &(id, level) in pieces {
            session.add_piece(Piece::new(EntityId(id), Tier::new(level).unwrap()));
        }
        session
    }

    fn at(id: EntityId) -> Option<Vec2> {
        Some(Vec2::new(id.0 as f32 * 10.0, 100.0))
    }

    #[test]
    fn same_tier_pair_is_claimed_once() {
        let mut session = session_with(&[(1, 3), (2, 3)]);
        let mut engine = MergeEngine::new();
        // duplicate notifications in the same step
        engine.observe(&[started(1, 2), started(2, 1), started(1, 2)]);

        let pending = engine.try_begin(&mut session, at).unwrap();
        assert_eq!((pending.a, pending.b), (EntityId(1), EntityId(2)));
        assert_eq!(pending.tier, Tier::new(4).unwrap());
        assert_eq!(pending.midpoint, Vec2::new(15.0, 100.0));
        assert_eq!(session.piece(EntityId(1)).unwrap().merge_state(), MergeState::Merging);

        assert!(engine.try_begin(&mut session, at).is_none(), "guard is held");
        engine.finish();
        assert!(engine.try_begin(&mut session, at).is_none(), "pair already claimed");
    }

    #[test]
    fn mismatched_tiers_and_non_pieces_are_ignored() {
        let mut session = session_with(&[(1, 0), (2, 1)]);
        let mut engine = MergeEngine::new();
        // 99 is the floor, not a piece
        engine.observe(&[started(1, 2), started(1, 99)]);
        assert!(engine.try_begin(&mut session, at).is_none());
        assert!(!engine.in_flight());
    }

    #[test]
    fn second_qualifying_pair_waits_for_the_first() {
        let mut session = session_with(&[(1, 2), (2, 2), (3, 5), (4, 5)]);
        let mut engine = MergeEngine::new();
        engine.observe(&[started(3, 4), started(1, 2)]);

        let first = engine.try_begin(&mut session, at).unwrap();
        assert_eq!(first.a, EntityId(1));
        assert!(engine.try_begin(&mut session, at).is_none());

        engine.finish();
        let second = engine.try_begin(&mut session, at).unwrap();
        assert_eq!((second.a, second.b), (EntityId(3), EntityId(4)));
        assert_eq!(second.tier, Tier::new(6).unwrap());
    }

    #[test]
    fn ended_contacts_do_not_merge() {
        let mut session = session_with(&[(1, 1), (2, 1)]);
        let mut engine = MergeEngine::new();
        engine.observe(&[started(1, 2)]);
        engine.observe(&[CollisionPair { started: false, ..started(2, 1) }]);
        assert!(engine.try_begin(&mut session, at).is_none());
    }

    #[test]
    fn forget_drops_contacts_of_removed_entities() {
        let mut engine = MergeEngine::new();
        engine.observe(&[started(1, 2), started(2, 3), started(3, 4)]);
        engine.forget(EntityId(2));
        assert_eq!(engine.contact_count(), 1);
    }

    #[test]
    fn largest_tier_merges_into_terminal_with_its_own_cue() {
        let mut session = session_with(&[(1, 10), (2, 10)]);
        let mut engine = MergeEngine::new();
        engine.observe(&[started(1, 2)]);
        let pending = engine.try_begin(&mut session, at).unwrap();
        assert!(pending.tier.is_terminal());
        for streak in 0..12 {
            assert_eq!(merge_cue(pending.tier, streak), TERMINAL_CUE);
        }
    }

    #[test]
    fn terminal_pieces_never_pair() {
        let mut session = session_with(&[(1, 11), (2, 11)]);
        let mut engine = MergeEngine::new();
        engine.observe(&[started(1, 2)]);
        assert!(engine.try_begin(&mut session, at).is_none());
    }

    #[test]
    fn streak_cues_are_clamped() {
        let tier = Tier::new(3).unwrap();
        assert_eq!(merge_cue(tier, 0), 1);
        assert_eq!(merge_cue(tier, 7), 8);
        assert_eq!(merge_cue(tier, 40), 8);
    }

    proptest! {
        #[test]
        fn merge_yields_next_tier_at_midpoint(
            level in 0u8..=10,
            ax in 0.0f32..800.0, ay in 0.0f32..600.0,
            bx in 0.0f32..800.0, by in 0.0f32..600.0,
        ) {
            let mut session = session_with(&[(1, level), (2, level)]);
            let mut engine = MergeEngine::new();
            engine.observe(&[started(2, 1)]);
            let positions = move |id: EntityId| {
                Some(if id == EntityId(1) { Vec2::new(ax, ay) } else { Vec2::new(bx, by) })
            };

            let pending = engine.try_begin(&mut session, positions).unwrap();
            prop_assert_eq!(pending.tier.index(), level + 1);
            prop_assert!((pending.midpoint - Vec2::new((ax + bx) / 2.0, (ay + by) / 2.0)).length() < 1e-3);
            prop_assert_eq!(merge_score(pending.tier), (u32::from(level) + 1) * 10);
        }
    }
}
