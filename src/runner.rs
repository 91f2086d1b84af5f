//! Fixed-step driver
//!
//! Wall-clock frame deltas accumulate; the session ticks at `SIM_DT` until
//! the accumulator drains, so movement speed does not depend on the display
//! refresh rate. Input is latched between frames: fire is held, pause and
//! skip-wave are one-shot.

use crate::consts::*;
use crate::sim::{
    CombatEvent, HudStats, Phase, RenderSnapshot, Session, TickInput, Transition,
    TransitionError, tick,
};

/// Everything that happened during one display frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Ticks run this frame (0..=MAX_SUBSTEPS)
    pub substeps: u32,
    pub events: Vec<CombatEvent>,
    pub transitions: Vec<Transition>,
    pub new_high_score: Option<f64>,
}

/// Accumulator-driven session driver
pub struct GameRunner {
    session: Session,
    accumulator: f32,
    input: TickInput,
}

impl GameRunner {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Latest pointer position (player center-x target)
    pub fn set_pointer_x(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    /// Fire while held
    pub fn set_fire_held(&mut self, held: bool) {
        self.input.fire = held;
    }

    /// Toggle pause on the next tick
    pub fn request_pause(&mut self) {
        self.input.pause = true;
    }

    /// Debug: clear the current wave on the next tick
    pub fn request_skip_wave(&mut self) {
        self.input.skip_wave = true;
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Start a run from the menu, discarding leftover time
    pub fn start(&mut self) -> Result<Transition, TransitionError> {
        self.accumulator = 0.0;
        self.session.start()
    }

    /// Run simulation ticks for a frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut frame = FrameReport::default();
        while self.accumulator >= SIM_DT && frame.substeps < MAX_SUBSTEPS {
            let report = tick(&mut self.session, &self.input);
            self.accumulator -= SIM_DT;
            frame.substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.skip_wave = false;

            frame.events.extend(report.events);
            frame.transitions.extend(report.transitions);
            if report.new_high_score.is_some() {
                frame.new_high_score = report.new_high_score;
            }
        }

        // Spiral of death guard: drop time we could not simulate
        if frame.substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        frame
    }

    /// Plain numbers for the HUD after the last frame
    pub fn hud(&self) -> HudStats {
        self.session.hud()
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        self.session.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualClock;
    use crate::tuning::Tuning;

    fn runner() -> (GameRunner, ManualClock) {
        let clock = ManualClock::new(0);
        let tuning = Tuning {
            enemy_fire_chance: 0.0,
            ..Default::default()
        };
        let session = Session::new(
            tuning,
            3,
            Box::new(clock.clone()),
            Box::new(MemoryStore::default()),
        );
        let mut runner = GameRunner::new(session);
        runner.start().unwrap();
        (runner, clock)
    }

    #[test]
    fn test_accumulator_substeps() {
        let (mut runner, _clock) = runner();
        // Less than one step: nothing runs yet
        assert_eq!(runner.frame(SIM_DT * 0.5).substeps, 0);
        // Leftover plus this frame crosses one step
        assert_eq!(runner.frame(SIM_DT * 0.6).substeps, 1);
        assert_eq!(runner.frame(SIM_DT * 3.0).substeps, 3);
        assert_eq!(runner.session().time_ticks(), 4);
    }

    #[test]
    fn test_frame_delta_capped() {
        let (mut runner, _clock) = runner();
        // A 5s hitch is capped to 0.1s (about 6 ticks at 60 Hz), well under
        // the substep limit an uncapped delta would hit
        let frame = runner.frame(5.0);
        assert!(frame.substeps >= 5 && frame.substeps <= 6);
        assert!(frame.substeps < MAX_SUBSTEPS);
        assert_eq!(runner.frame(f32::NAN).substeps, 0);
        assert_eq!(runner.frame(-1.0).substeps, 0);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let (mut runner, _clock) = runner();
        runner.request_pause();
        let frame = runner.frame(SIM_DT * 2.0);
        assert_eq!(frame.substeps, 2);
        // Paused on the first tick and stayed paused on the second
        assert_eq!(runner.phase(), Phase::Paused);
        assert_eq!(frame.transitions.len(), 1);

        runner.request_pause();
        runner.frame(SIM_DT);
        assert_eq!(runner.phase(), Phase::Playing);
    }

    #[test]
    fn test_fire_is_held() {
        let (mut runner, clock) = runner();
        runner.set_fire_held(true);
        runner.frame(SIM_DT);
        clock.advance(400);
        runner.frame(SIM_DT);
        assert_eq!(runner.session().player_bullet_count(), 2);

        runner.set_fire_held(false);
        clock.advance(400);
        runner.frame(SIM_DT);
        assert_eq!(runner.session().player_bullet_count(), 2);
    }

    #[test]
    fn test_pointer_moves_player() {
        let (mut runner, _clock) = runner();
        runner.set_pointer_x(1000.0);
        runner.frame(SIM_DT);
        assert!((runner.snapshot().player.center_x() - 460.0).abs() < 1e-3);
    }

    #[test]
    fn test_skip_wave_levels_up() {
        let (mut runner, _clock) = runner();
        runner.request_skip_wave();
        runner.frame(SIM_DT);
        assert_eq!(runner.hud().level, 2);
        assert_eq!(runner.phase(), Phase::LevelComplete);
    }
}
