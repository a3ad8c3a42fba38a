use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("world size must be positive, got {width}x{height}")]
    InvalidWorld { width: f32, height: f32 },
    #[error("{name} must not be negative, got {value}")]
    NegativeDelay { name: &'static str, value: f64 },
    #[error("fail line ratio must be inside (0, 1), got {0}")]
    FailRatio(f32),
}

/// Tunables of a merge-drop session. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub world_width: f32,
    pub world_height: f32,
    /// Downward acceleration in world units per second squared.
    pub gravity: f32,
    pub restitution: f32,
    /// Commits above this y are ignored.
    pub drop_dead_zone: f32,
    pub drop_cooldown_ms: f64,
    /// Delay between claiming a merge pair and replacing it.
    pub merge_settle_ms: f64,
    /// Merges completing closer together than this extend the streak.
    pub streak_window_ms: f64,
    pub fail_scan_delay_ms: f64,
    /// Fail line height as a fraction of the world height, from the top.
    pub fail_line_ratio: f32,
    /// Time between the fail flash and the game-over notification.
    pub game_over_delay_ms: f64,
    pub score_pulse_ms: f64,
    pub score_pulse_scale: f32,
    pub wall_thickness: f32,
    pub seed: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            gravity: 980.0,
            restitution: 0.4,
            drop_dead_zone: 100.0,
            drop_cooldown_ms: 500.0,
            merge_settle_ms: 30.0,
            streak_window_ms: 1000.0,
            fail_scan_delay_ms: 500.0,
            fail_line_ratio: 0.1,
            game_over_delay_ms: 100.0,
            score_pulse_ms: 100.0,
            score_pulse_scale: 0.85,
            wall_thickness: 40.0,
            seed: 0x5eed,
        }
    }
}

impl MergeConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(ConfigError::InvalidWorld {
                width: self.world_width,
                height: self.world_height,
            });
        }

        let delays = [
            ("drop_cooldown_ms", self.drop_cooldown_ms),
            ("merge_settle_ms", self.merge_settle_ms),
            ("streak_window_ms", self.streak_window_ms),
            ("fail_scan_delay_ms", self.fail_scan_delay_ms),
            ("game_over_delay_ms", self.game_over_delay_ms),
            ("score_pulse_ms", self.score_pulse_ms),
        ];
        if let Some((name, value)) = delays.into_iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::NegativeDelay { name, value });
        }

        if !(self.fail_line_ratio > 0.0 && self.fail_line_ratio < 1.0) {
            return Err(ConfigError::FailRatio(self.fail_line_ratio));
        }
        Ok(())
    }

    /// Y coordinate of the fail line.
    pub fn fail_line_y(&self) -> f32 {
        self.world_height * self.fail_line_ratio
    }
}
