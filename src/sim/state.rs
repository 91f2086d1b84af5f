//! Entity records and the scalar game state
//!
//! Entities are plain data plus the movement rules that only touch
//! themselves. Cross-entity rules live in `formation` and `combat`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::clamp_center;
use crate::tuning::Tuning;

/// Vertical travel direction of a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the top of the screen (player-fired)
    Up,
    /// Toward the bottom of the screen (enemy-fired)
    Down,
}

impl Direction {
    /// -1 for up, +1 for down (screen y grows downward)
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A bullet entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub bounds: Aabb,
    pub speed: f32,
    pub direction: Direction,
    pub owner: BulletOwner,
}

impl Bullet {
    /// Upward shot centered on the player's top edge
    pub fn player_shot(player: &Player, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
        let center = Vec2::new(player.center_x(), player.bounds.y - size.y / 2.0);
        Self {
            bounds: Aabb::from_center(center, size),
            speed: tuning.player_bullet_speed,
            direction: Direction::Up,
            owner: BulletOwner::Player,
        }
    }

    /// Downward shot from an enemy's lower edge
    pub fn enemy_shot(enemy: &Enemy, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
        let center = Vec2::new(enemy.bounds.center().x, enemy.bounds.bottom() + size.y / 2.0);
        Self {
            bounds: Aabb::from_center(center, size),
            speed: tuning.enemy_bullet_speed,
            direction: Direction::Down,
            owner: BulletOwner::Enemy,
        }
    }

    /// Per-tick displacement
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(0.0, self.speed * self.direction.sign())
    }

    /// Move one tick
    pub fn advance(&mut self) {
        let vel = self.velocity();
        self.bounds.translate(vel);
    }
}

/// An enemy in the formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub bounds: Aabb,
    /// Horizontal speed (pixels/tick), fixed at spawn
    pub speed: f32,
    /// Grid row (0 = top)
    pub row: u32,
    pub col: u32,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub bounds: Aabb,
    pub speed: f32,
    /// Desired center-x (from the pointer)
    pub target_x: f32,
    /// Clock reading of the last successful shot
    pub last_shot_ms: Option<u64>,
}

impl Player {
    /// Spawn centered at the bottom of the playfield
    pub fn new(tuning: &Tuning) -> Self {
        let center_x = tuning.canvas_width / 2.0;
        Self {
            bounds: Aabb::new(
                center_x - tuning.player_width / 2.0,
                tuning.player_y(),
                tuning.player_width,
                tuning.player_height,
            ),
            speed: tuning.player_speed,
            target_x: center_x,
            last_shot_ms: None,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.bounds.x + self.bounds.width / 2.0
    }

    /// Place the player by center-x, clamped into the playfield
    pub fn set_center_x(&mut self, center_x: f32, canvas_width: f32) {
        let cx = clamp_center(center_x, self.bounds.width, canvas_width);
        self.bounds.x = cx - self.bounds.width / 2.0;
    }

    pub fn set_target_x(&mut self, target_x: f32) {
        if target_x.is_finite() {
            self.target_x = target_x;
        }
    }

    /// Ease toward the target by `smoothing` of the remaining distance, then clamp
    pub fn advance(&mut self, tuning: &Tuning) {
        let cx = self.center_x();
        let next = cx + (self.target_x - cx) * tuning.player_smoothing;
        self.set_center_x(next, tuning.canvas_width);
    }

    /// Cooldown has elapsed at `now_ms`
    pub fn can_fire_at(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
        }
    }

    /// Fire if the cooldown has elapsed and fewer than the max player
    /// bullets are alive. The caller appends the bullet.
    pub fn try_fire(
        &mut self,
        now_ms: u64,
        live_player_bullets: usize,
        tuning: &Tuning,
    ) -> Option<Bullet> {
        if live_player_bullets >= tuning.max_player_bullets {
            return None;
        }
        if !self.can_fire_at(now_ms, tuning.fire_cooldown_ms) {
            return None;
        }
        self.last_shot_ms = Some(now_ms);
        Some(Bullet::player_shot(self, tuning))
    }
}

/// Score, lives and progression (serializable; high score persists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: f64,
    pub lives: u32,
    /// 1-based level
    pub level: u32,
    /// Hits since the last life lost
    pub consecutive_hits: u32,
    pub high_score: f64,
    pub is_over: bool,
}

impl GameState {
    pub fn new(lives: u32, high_score: f64) -> Self {
        Self {
            score: 0.0,
            lives,
            level: 1,
            consecutive_hits: 0,
            high_score: sanitize_score(high_score),
            is_over: lives == 0,
        }
    }

    pub fn hud(&self) -> HudStats {
        HudStats {
            score: self.score,
            lives: self.lives,
            level: self.level,
            high_score: self.high_score,
        }
    }
}

/// Replace NaN/negative/infinite scores with zero
#[inline]
pub fn sanitize_score(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Plain numbers for the HUD text collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudStats {
    pub score: f64,
    pub lives: u32,
    pub level: u32,
    pub high_score: f64,
}
