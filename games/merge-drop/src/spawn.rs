//! Spawn selector: weighted draw of the next tier to drop.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::levels::Tier;

/// Relative weight of tiers 0..=5 (sums to 100).
pub const SPAWN_WEIGHTS: [u32; 6] = [5, 15, 25, 25, 25, 5];

pub fn total_weight() -> u32 {
    SPAWN_WEIGHTS.iter().sum()
}

/// Map a draw in `[0, total_weight)` to a tier by walking the cumulative weights.
/// Draws at or past the total land on the last tier.
pub fn pick_tier(draw: f64) -> Tier {
    let mut cumulative = 0.0;
    for (level, weight) in SPAWN_WEIGHTS.iter().enumerate() {
        cumulative += f64::from(*weight);
        if draw < cumulative {
            return Tier::new(level as u8).unwrap_or(Tier::SMALLEST);
        }
    }
    Tier::new((SPAWN_WEIGHTS.len() - 1) as u8).unwrap_or(Tier::SMALLEST)
}

/// Seeded source of spawn tiers. Same seed, same sequence.
pub struct SpawnSelector {
    rng: Pcg32,
}

impl SpawnSelector {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn next(&mut self) -> Tier {
        let draw = self.rng.random_range(0.0..f64::from(total_weight()));
        pick_tier(draw)
    }
}
