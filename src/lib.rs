//! Star Swarm - A formation arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, phases)
//! - `runner`: Fixed-step driver with input latching
//! - `platform`: Clock and logging abstraction for browser/native
//! - `persistence`: High score storage collaborators
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod platform;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use persistence::{HighScoreStore, MemoryStore};
pub use platform::{Clock, ManualClock, SystemClock};
pub use runner::GameRunner;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate. Every per-tick constant in `Tuning` is expressed
    /// against this rate (speeds are pixels per tick, smoothing is per tick).
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield defaults
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_SMOOTHING: f32 = 0.1;
    pub const FIRE_COOLDOWN_MS: u64 = 300;
    pub const MAX_BULLETS: usize = 3;

    /// Bullet defaults
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;

    /// Formation defaults
    pub const ENEMY_ROWS: u32 = 5;
    pub const ENEMY_COLS: u32 = 10;
    pub const DESCENT_AMOUNT: f32 = 20.0;
    pub const ENEMY_FIRE_CHANCE: f64 = 0.002;
    pub const ENEMY_BASE_POINTS: f64 = 10.0;

    pub const STARTING_LIVES: u32 = 3;
}

/// Clamp a center coordinate so a span of `width` stays inside `[0, extent]`
#[inline]
pub fn clamp_center(center: f32, width: f32, extent: f32) -> f32 {
    let half = width / 2.0;
    if extent <= width {
        return extent / 2.0;
    }
    center.clamp(half, extent - half)
}
