//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Injected clock only
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod formation;
pub mod phase;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps};
pub use combat::{CombatEvent, HitCause, resolve};
pub use formation::Formation;
pub use phase::{Phase, PhaseMachine, Transition, TransitionError};
pub use scoring::{HitOutcome, multiplier_for};
pub use state::{Bullet, BulletOwner, Direction, Enemy, GameState, HudStats, Player};
pub use tick::{RenderSnapshot, Session, TickInput, TickReport, tick};
