//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads comes from a `Tuning`.
//! Defaults match `crate::consts`; a JSON file may override any subset.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning (per-tick units at `TICK_RATE_HZ`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Gap between the player's bottom edge and the canvas bottom
    pub player_bottom_margin: f32,
    /// Nominal horizontal speed (pixels/tick), exposed to renderers
    pub player_speed: f32,
    /// Fraction of the remaining distance to the target covered each tick
    pub player_smoothing: f32,
    pub fire_cooldown_ms: u64,
    pub max_player_bullets: usize,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub player_bullet_speed: f32,
    pub enemy_bullet_speed: f32,

    // === Formation ===
    pub enemy_rows: u32,
    pub enemy_cols: u32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_padding: f32,
    pub enemy_offset_left: f32,
    pub enemy_offset_top: f32,
    /// Speed of the top row on level 1 (pixels/tick)
    pub enemy_base_speed: f32,
    /// Extra speed per row below the top
    pub enemy_row_speed_step: f32,
    /// Extra base speed per level above 1
    pub enemy_level_speed_step: f32,
    pub descent_amount: f32,
    /// Per-enemy, per-tick probability of firing
    pub enemy_fire_chance: f64,

    // === Progression ===
    pub enemy_base_points: f64,
    pub starting_lives: u32,
    /// Ticks spent in LevelComplete before play resumes
    pub level_complete_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_margin: 20.0,
            player_speed: 5.0,
            player_smoothing: PLAYER_SMOOTHING,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            max_player_bullets: MAX_BULLETS,

            bullet_width: 4.0,
            bullet_height: 10.0,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,

            enemy_rows: ENEMY_ROWS,
            enemy_cols: ENEMY_COLS,
            enemy_width: 40.0,
            enemy_height: 30.0,
            enemy_padding: 15.0,
            enemy_offset_left: 60.0,
            enemy_offset_top: 50.0,
            enemy_base_speed: 1.0,
            enemy_row_speed_step: 0.2,
            enemy_level_speed_step: 0.25,
            descent_amount: DESCENT_AMOUNT,
            enemy_fire_chance: ENEMY_FIRE_CHANCE,

            enemy_base_points: ENEMY_BASE_POINTS,
            starting_lives: STARTING_LIVES,
            level_complete_ticks: 2 * TICK_RATE_HZ,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields fall back to defaults)
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("tuning: invalid JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("tuning: failed to read {}", path.display()))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{:#}; using default tuning", e);
                Self::default()
            }
        }
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                bail!("tuning: {} must be positive, got {}", name, value);
            }
        }
        if self.player_width > self.canvas_width {
            bail!("tuning: player_width exceeds canvas_width");
        }
        if !(0.0..=1.0).contains(&self.player_smoothing) {
            bail!("tuning: player_smoothing must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            bail!("tuning: enemy_fire_chance must be in [0, 1]");
        }
        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            bail!("tuning: formation grid must have at least one enemy");
        }
        if self.starting_lives == 0 {
            bail!("tuning: starting_lives must be at least 1");
        }
        Ok(())
    }

    /// Top edge of the player sprite
    pub fn player_y(&self) -> f32 {
        self.canvas_height - self.player_height - self.player_bottom_margin
    }

    /// Base enemy speed for a level (level is 1-based)
    pub fn enemy_speed_for_level(&self, level: u32) -> f32 {
        self.enemy_base_speed + level.saturating_sub(1) as f32 * self.enemy_level_speed_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "enemy_rows": 2, "descent_amount": 12.5 }"#).unwrap();
        assert_eq!(tuning.enemy_rows, 2);
        assert_eq!(tuning.descent_amount, 12.5);
        assert_eq!(tuning.enemy_cols, ENEMY_COLS);
        assert_eq!(tuning.canvas_width, CANVAS_WIDTH);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Tuning::from_json(r#"{ "canvas_width": 0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "enemy_fire_chance": 2.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "starting_lives": 0 }"#).is_err());
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/definitely/not/here/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_enemy_speed_scales_with_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.enemy_speed_for_level(1), 1.0);
        assert_eq!(tuning.enemy_speed_for_level(3), 1.5);
    }
}
