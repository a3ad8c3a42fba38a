//! Level table: tier index to radius and sprite name.

/// Piece radius per tier, in world units (one unit per CSS pixel).
pub const RADII: [f32; 11] = [30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 100.0, 120.0, 140.0, 170.0, 200.0];

/// Size/rank level of a piece.
///
/// Tiers 0..=10 merge with their own kind. Tier 11 is the terminal tier produced by two
/// tier-10 pieces; it never merges again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tier(u8);

impl Tier {
    pub const SMALLEST: Tier = Tier(0);
    pub const MAX_MERGEABLE: Tier = Tier(10);
    pub const TERMINAL: Tier = Tier(11);

    /// `None` for levels past the terminal tier.
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::TERMINAL.0).then_some(Tier(level))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// The tier a same-tier pair merges into. `None` for the terminal tier.
    pub fn next(self) -> Option<Tier> {
        if self.is_terminal() {
            None
        } else {
            Some(Tier(self.0 + 1))
        }
    }

    /// Collision radius. The terminal tier reuses the tier-10 size.
    pub fn radius(self) -> f32 {
        RADII[usize::from(self.0.min(Self::MAX_MERGEABLE.0))]
    }

    pub fn diameter(self) -> f32 {
        self.radius() * 2.0
    }

    /// Manifest sprite name (`tier_0` .. `tier_11`).
    pub fn sprite_name(self) -> String {
        format!("tier_{}", self.0)
    }

    /// Sprite to use when the manifest lacks [`Tier::sprite_name`].
    pub fn fallback_sprite_name(self) -> String {
        Tier(self.0.min(Self::MAX_MERGEABLE.0)).sprite_name()
    }
}
