//! Score and lives tracking
//!
//! Every `Hit` grows a streak; every fifth consecutive hit raises the
//! multiplier by one. Taking damage resets the streak.

use super::state::{GameState, sanitize_score};

/// Hits needed per multiplier step
pub const HITS_PER_MULTIPLIER_STEP: u32 = 5;

/// Level bonus factor applied to every hit
pub const LEVEL_BONUS_FACTOR: f64 = 0.5;

/// Multiplier for a streak length
#[inline]
pub fn multiplier_for(consecutive_hits: u32) -> u32 {
    1 + consecutive_hits / HITS_PER_MULTIPLIER_STEP
}

/// Result of scoring one hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Points added to the score
    pub awarded: f64,
    pub multiplier: u32,
    /// Set when this hit produced a new high score
    pub new_high_score: Option<f64>,
}

impl GameState {
    /// Current multiplier
    pub fn multiplier(&self) -> u32 {
        multiplier_for(self.consecutive_hits)
    }

    /// Current level bonus
    pub fn level_bonus(&self) -> f64 {
        self.level as f64 * LEVEL_BONUS_FACTOR
    }

    /// Score an enemy hit worth `base_points` (non-positive values score nothing)
    pub fn register_hit(&mut self, base_points: f64) -> HitOutcome {
        self.consecutive_hits = self.consecutive_hits.saturating_add(1);
        let multiplier = self.multiplier();
        let awarded = sanitize_score(base_points * multiplier as f64 * self.level_bonus());
        self.score = sanitize_score(self.score + awarded);

        let new_high_score = if self.score > self.high_score {
            self.high_score = self.score;
            Some(self.high_score)
        } else {
            None
        };

        HitOutcome {
            awarded,
            multiplier,
            new_high_score,
        }
    }

    /// Lose one life; the run is over once none remain
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.consecutive_hits = 0;
        if self.lives == 0 {
            self.is_over = true;
        }
    }

    /// Advance to the next level
    pub fn next_level(&mut self) {
        self.level = self.level.saturating_add(1);
        self.consecutive_hits = 0;
    }
}
