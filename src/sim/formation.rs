//! Enemy formation movement
//!
//! The whole swarm shares one horizontal direction. When any enemy's next
//! step would leave the playfield, the direction flips and the swarm drops
//! by `descent_amount` in that same tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{Bullet, Enemy};
use crate::tuning::Tuning;

/// The enemy swarm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub enemies: Vec<Enemy>,
    /// Shared horizontal direction, -1.0 or +1.0
    pub direction: f32,
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            enemies: Vec::new(),
            direction: 1.0,
        }
    }
}

impl Formation {
    /// Spawn a full grid for `level`
    pub fn spawn_wave(tuning: &Tuning, level: u32) -> Self {
        let base_speed = tuning.enemy_speed_for_level(level);
        let mut enemies = Vec::with_capacity((tuning.enemy_rows * tuning.enemy_cols) as usize);

        for row in 0..tuning.enemy_rows {
            // Lower rows move faster; fixed for the enemy's lifetime
            let speed = base_speed + row as f32 * tuning.enemy_row_speed_step;
            for col in 0..tuning.enemy_cols {
                let x = tuning.enemy_offset_left
                    + col as f32 * (tuning.enemy_width + tuning.enemy_padding);
                let y = tuning.enemy_offset_top
                    + row as f32 * (tuning.enemy_height + tuning.enemy_padding);
                enemies.push(Enemy {
                    bounds: Aabb::new(x, y, tuning.enemy_width, tuning.enemy_height),
                    speed,
                    row,
                    col,
                });
            }
        }

        log::info!(
            "Wave for level {}: {} enemies, base speed {}",
            level,
            enemies.len(),
            base_speed
        );

        Self {
            enemies,
            direction: 1.0,
        }
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// True if any enemy's next step in the current direction leaves `[0, width]`
    pub fn at_edge(&self, canvas_width: f32) -> bool {
        self.enemies.iter().any(|e| {
            let next_x = e.bounds.x + e.speed * self.direction;
            next_x < 0.0 || next_x + e.bounds.width > canvas_width
        })
    }

    /// Move the swarm one tick
    pub fn advance(&mut self, tuning: &Tuning) {
        let descend = self.at_edge(tuning.canvas_width);
        if descend {
            self.direction = -self.direction;
        }
        let drop = if descend { tuning.descent_amount } else { 0.0 };
        for enemy in &mut self.enemies {
            enemy
                .bounds
                .translate(Vec2::new(enemy.speed * self.direction, drop));
        }
    }

    /// Roll each enemy's fire chance; returns the new enemy bullets
    pub fn fire<R: Rng>(&self, tuning: &Tuning, rng: &mut R) -> Vec<Bullet> {
        let mut shots = Vec::new();
        if tuning.enemy_fire_chance <= 0.0 {
            return shots;
        }
        for enemy in &self.enemies {
            if rng.random::<f64>() < tuning.enemy_fire_chance {
                shots.push(Bullet::enemy_shot(enemy, tuning));
            }
        }
        shots
    }
}
