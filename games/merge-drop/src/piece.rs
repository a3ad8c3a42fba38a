//! Per-piece state machines.
//!
//! Landing:  Falling -> Settled
//! Merging:  Unmerged -> Merging -> Consumed
//!
//! Transitions only move forward. Every transition method reports whether it fired,
//! so a second attempt is a harmless no-op.

use drop_engine::EntityId;

use crate::levels::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Falling,
    /// Has touched another piece or the floor; eligible for fail-line checks.
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Unmerged,
    /// Claimed by a pending merge; every later contact involving it is inert.
    Merging,
    /// Removed from the world by a completed merge.
    Consumed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: EntityId,
    tier: Tier,
    landing: Landing,
    merge: MergeState,
}

impl Piece {
    pub fn new(id: EntityId, tier: Tier) -> Self {
        Self {
            id,
            tier,
            landing: Landing::Falling,
            merge: MergeState::Unmerged,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn landing(&self) -> Landing {
        self.landing
    }

    pub fn merge_state(&self) -> MergeState {
        self.merge
    }

    pub fn is_settled(&self) -> bool {
        self.landing == Landing::Settled
    }

    /// Unmerged pieces below the terminal tier can still take part in a merge.
    pub fn can_merge(&self) -> bool {
        self.merge == MergeState::Unmerged && self.tier.next().is_some()
    }

    /// Falling -> Settled.
    pub fn settle(&mut self) -> bool {
        if self.landing == Landing::Falling {
            self.landing = Landing::Settled;
            true
        } else {
            false
        }
    }

    /// Unmerged -> Merging.
    pub fn claim(&mut self) -> bool {
        if self.merge == MergeState::Unmerged {
            self.merge = MergeState::Merging;
            true
        } else {
            false
        }
    }

    /// Merging -> Consumed.
    pub fn consume(&mut self) -> bool {
        if self.merge == MergeState::Merging {
            self.merge = MergeState::Consumed;
            true
        } else {
            false
        }
    }
}
