//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Order per tick:
//! input → player → bullets → formation → combat → score/lives → win/loss →
//! phase transitions.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::combat::{self, CombatEvent};
use super::formation::Formation;
use super::phase::{Phase, PhaseMachine, Transition, TransitionError};
use super::state::{Bullet, BulletOwner, Enemy, GameState, HudStats, Player};
use crate::persistence::HighScoreStore;
use crate::platform::Clock;
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Target player center-x (from mouse/touch position)
    pub pointer_x: Option<f32>,
    /// Fire requested this tick
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Skip to next wave (debug/testing)
    pub skip_wave: bool,
    /// Demo mode - steer under the lowest enemy and keep firing
    pub autopilot: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Entities advanced this tick
    pub ticked: bool,
    pub events: Vec<CombatEvent>,
    pub transitions: Vec<Transition>,
    /// Set when the high score was raised this tick
    pub new_high_score: Option<f64>,
    /// Wave cleared and the next one spawned
    pub level_up: bool,
}

/// Read-only view for the render collaborator
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderSnapshot<'a> {
    pub phase: Phase,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub state: &'a GameState,
}

/// One play session: every piece of mutable game state lives here
pub struct Session {
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    phase: PhaseMachine,
    clock: Box<dyn Clock>,
    store: Box<dyn HighScoreStore>,
    /// Simulation tick counter (Playing ticks only)
    time_ticks: u64,
    /// Ticks left in LevelComplete
    level_complete_ticks: u32,
    pub state: GameState,
    pub player: Player,
    pub formation: Formation,
    /// Player and enemy bullets, in spawn order
    pub bullets: Vec<Bullet>,
}

impl Session {
    /// Create a session in the Menu phase. The high score is read from
    /// `store` here and nowhere else.
    pub fn new(
        tuning: Tuning,
        seed: u64,
        clock: Box<dyn Clock>,
        mut store: Box<dyn HighScoreStore>,
    ) -> Self {
        let high_score = store.load();
        log::info!("Session created with seed {} (high score {})", seed, high_score);
        Self {
            state: GameState::new(tuning.starting_lives, high_score),
            player: Player::new(&tuning),
            formation: Formation::default(),
            bullets: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            phase: PhaseMachine::new(),
            time_ticks: 0,
            level_complete_ticks: 0,
            tuning,
            seed,
            clock,
            store,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    pub fn phases(&self) -> &PhaseMachine {
        &self.phase
    }

    /// Mutable access for registering transition observers
    pub fn phases_mut(&mut self) -> &mut PhaseMachine {
        &mut self.phase
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn hud(&self) -> HudStats {
        self.state.hud()
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            phase: self.phase.current(),
            player: &self.player,
            enemies: &self.formation.enemies,
            bullets: &self.bullets,
            state: &self.state,
        }
    }

    /// Live player-owned bullets
    pub fn player_bullet_count(&self) -> usize {
        self.bullets
            .iter()
            .filter(|b| b.owner == BulletOwner::Player)
            .count()
    }

    /// Fresh player, wave and state; the high score carries over
    fn reset(&mut self) {
        self.state = GameState::new(self.tuning.starting_lives, self.state.high_score);
        self.player = Player::new(&self.tuning);
        self.formation = Formation::spawn_wave(&self.tuning, self.state.level);
        self.bullets.clear();
        self.time_ticks = 0;
        self.level_complete_ticks = 0;
    }

    /// Begin a new run (Menu → Playing)
    pub fn start(&mut self) -> Result<Transition, TransitionError> {
        // Paused/LevelComplete may also enter Playing, but only Menu starts a run
        if !self.phase.is(Phase::Menu) {
            return Err(TransitionError {
                from: self.phase.current(),
                to: Phase::Playing,
            });
        }
        self.reset();
        let now = self.clock.now_ms();
        let transition = self.phase.transition_to(Phase::Playing, now)?;
        log::info!("Run started (seed {})", self.seed);
        Ok(transition)
    }

    pub fn pause(&mut self) -> Result<Transition, TransitionError> {
        let now = self.clock.now_ms();
        self.phase.transition_to(Phase::Paused, now)
    }

    /// Paused → Playing only
    pub fn resume(&mut self) -> Result<Transition, TransitionError> {
        if !self.phase.is(Phase::Paused) {
            return Err(TransitionError {
                from: self.phase.current(),
                to: Phase::Playing,
            });
        }
        let now = self.clock.now_ms();
        self.phase.transition_to(Phase::Playing, now)
    }

    pub fn return_to_menu(&mut self) -> Result<Transition, TransitionError> {
        let now = self.clock.now_ms();
        self.phase.transition_to(Phase::Menu, now)
    }

    /// Go back to the previous phase when the table allows it
    pub fn back(&mut self) -> Result<Transition, TransitionError> {
        let now = self.clock.now_ms();
        self.phase.back(now)
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        tick(self, input)
    }

    fn enter(&mut self, to: Phase, now_ms: u64, report: &mut TickReport) -> bool {
        match self.phase.transition_to(to, now_ms) {
            Ok(transition) => {
                report.transitions.push(transition);
                true
            }
            Err(_) => false,
        }
    }

    /// Demo input: chase the lowest enemy and hold fire
    fn autopilot_input(&self, input: &TickInput) -> TickInput {
        let mut input = input.clone();
        let lowest = self.formation.enemies.iter().max_by(|a, b| {
            a.bounds
                .y
                .partial_cmp(&b.bounds.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(enemy) = lowest {
            input.pointer_x = Some(enemy.bounds.center().x);
            input.fire = true;
        }
        input
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();
    let now = session.clock.now_ms();

    // Handle pause toggle
    if input.pause {
        match session.phase.current() {
            Phase::Playing => {
                session.enter(Phase::Paused, now, &mut report);
                return report;
            }
            Phase::Paused => {
                session.enter(Phase::Playing, now, &mut report);
            }
            _ => {}
        }
    }

    match session.phase.current() {
        Phase::Playing => {}
        Phase::LevelComplete => {
            level_complete_tick(session, input, now, &mut report);
            return report;
        }
        // Nothing advances in Menu, Paused or GameOver
        _ => return report,
    }

    report.ticked = true;
    session.time_ticks += 1;

    let input = if input.autopilot {
        session.autopilot_input(input)
    } else {
        input.clone()
    };
    let tuning = &session.tuning;

    // Player
    if let Some(x) = input.pointer_x {
        session.player.set_target_x(x);
    }
    session.player.advance(tuning);
    if input.fire {
        let live = session
            .bullets
            .iter()
            .filter(|b| b.owner == BulletOwner::Player)
            .count();
        if let Some(bullet) = session.player.try_fire(now, live, tuning) {
            session.bullets.push(bullet);
        }
    }

    // Bullets
    for bullet in &mut session.bullets {
        bullet.advance();
    }
    let canvas_height = tuning.canvas_height;
    session
        .bullets
        .retain(|b| !b.bounds.outside_vertical(canvas_height));

    // Formation
    if input.skip_wave {
        session.formation.clear();
    }
    session.formation.advance(tuning);
    let shots = session.formation.fire(tuning, &mut session.rng);
    session.bullets.extend(shots);

    // Combat
    let events = combat::resolve(
        &session.player,
        &mut session.formation.enemies,
        &mut session.bullets,
        tuning.enemy_base_points,
        session.state.level,
    );

    // Score / lives
    for event in &events {
        match *event {
            CombatEvent::Hit { points, .. } => {
                let outcome = session.state.register_hit(points);
                if let Some(high) = outcome.new_high_score {
                    session.store.store(high);
                    report.new_high_score = Some(high);
                }
            }
            CombatEvent::PlayerHit { cause } => {
                session.state.lose_life();
                log::debug!("Player hit ({:?}), lives left {}", cause, session.state.lives);
            }
        }
    }
    report.events = events;

    // Loss beats a simultaneous wave clear
    if session.state.is_over {
        if session.enter(Phase::GameOver, now, &mut report) {
            log::info!(
                "Game over: score {} on level {} (high {})",
                session.state.score,
                session.state.level,
                session.state.high_score
            );
        }
        return report;
    }

    if session.formation.is_empty() {
        session.enter(Phase::LevelComplete, now, &mut report);
        session.state.next_level();
        session.formation = Formation::spawn_wave(&session.tuning, session.state.level);
        session.bullets.clear();
        session.level_complete_ticks = session.tuning.level_complete_ticks;
        report.level_up = true;
        log::info!("Wave cleared, now level {}", session.state.level);

        if session.level_complete_ticks == 0 {
            session.enter(Phase::Playing, now, &mut report);
        }
    }

    report
}

/// Rest between waves: the player may steer, nothing else moves
fn level_complete_tick(session: &mut Session, input: &TickInput, now: u64, report: &mut TickReport) {
    if let Some(x) = input.pointer_x {
        session.player.set_target_x(x);
    }
    session.player.advance(&session.tuning);

    session.level_complete_ticks = session.level_complete_ticks.saturating_sub(1);
    if session.level_complete_ticks == 0 {
        session.enter(Phase::Playing, now, report);
    }
}
