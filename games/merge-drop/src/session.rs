use std::collections::BTreeMap;

use drop_engine::EntityId;

use crate::levels::Tier;
use crate::piece::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// The fail line was crossed; the session ends once the game-over delay runs out.
    Failing,
}

/// Everything one play-through owns. Replaced wholesale on reset.
#[derive(Debug, Clone)]
pub struct Session {
    score: u32,
    pub next_tier: Tier,
    streak: u32,
    last_merge_ms: Option<f64>,
    pub can_drop: bool,
    pub pointer_x: f32,
    pub phase: Phase,
    pieces: BTreeMap<EntityId, Piece>,
}

impl Session {
    pub fn new(next_tier: Tier, pointer_x: f32) -> Self {
        Self {
            score: 0,
            next_tier,
            streak: 0,
            last_merge_ms: None,
            can_drop: true,
            pointer_x,
            phase: Phase::Playing,
            pieces: BTreeMap::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Score only ever grows.
    pub fn add_score(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Streak bookkeeping for a merge completing at `now_ms`.
    /// Within the window of the previous completion the streak grows, otherwise it restarts at 0.
    pub fn record_merge(&mut self, now_ms: f64, window_ms: f64) -> u32 {
        self.streak = match self.last_merge_ms {
            Some(last) if now_ms - last < window_ms => self.streak + 1,
            _ => 0,
        };
        self.last_merge_ms = Some(now_ms);
        self.streak
    }

    // -- Piece registry --

    pub fn add_piece(&mut self, piece: Piece) {
        self.pieces.insert(piece.id, piece);
    }

    /// Finish a claimed piece: Merging -> Consumed, then hand it back out of the registry.
    /// A piece that was never claimed stays put and `None` is returned.
    pub fn consume_piece(&mut self, id: EntityId) -> Option<Piece> {
        if !self.pieces.get_mut(&id)?.consume() {
            return None;
        }
        self.pieces.remove(&id)
    }

    pub fn piece(&self, id: EntityId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn piece_mut(&mut self, id: EntityId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// Live pieces in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::MergeState;

    #[test]
    fn streak_grows_inside_window_and_resets_outside() {
        let mut session = Session::new(Tier::SMALLEST, 0.0);
        // First merge of a session has nothing to chain from.
        assert_eq!(session.record_merge(0.0, 1000.0), 0);
        assert_eq!(session.record_merge(500.0, 1000.0), 1);
        assert_eq!(session.record_merge(1400.0, 1000.0), 0);
        assert_eq!(session.record_merge(2000.0, 1000.0), 1);
        assert_eq!(session.record_merge(2999.0, 1000.0), 2);
        assert_eq!(session.streak(), 2);
    }

    #[test]
    fn exact_window_gap_resets() {
        let mut session = Session::new(Tier::SMALLEST, 0.0);
        session.record_merge(100.0, 1000.0);
        assert_eq!(session.record_merge(1100.0, 1000.0), 0);
    }

    #[test]
    fn only_claimed_pieces_are_consumed() {
        let mut session = Session::new(Tier::SMALLEST, 0.0);
        session.add_piece(Piece::new(EntityId(1), Tier::SMALLEST));
        session.add_piece(Piece::new(EntityId(2), Tier::SMALLEST));
        session.piece_mut(EntityId(1)).unwrap().claim();

        let consumed = session.consume_piece(EntityId(1)).unwrap();
        assert_eq!(consumed.merge_state(), MergeState::Consumed);
        assert!(session.piece(EntityId(1)).is_none());

        assert!(session.consume_piece(EntityId(2)).is_none());
        assert_eq!(session.piece(EntityId(2)).unwrap().merge_state(), MergeState::Unmerged);
        assert!(session.consume_piece(EntityId(1)).is_none());
        assert_eq!(session.piece_count(), 1);
    }

    #[test]
    fn score_accumulates() {
        let mut session = Session::new(Tier::SMALLEST, 0.0);
        assert_eq!(session.add_score(20), 20);
        assert_eq!(session.add_score(110), 130);
        assert_eq!(session.score(), 130);
    }
}
