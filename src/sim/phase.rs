//! Session phase state machine
//!
//! Transitions not in the table are rejected with an error value and leave
//! the machine untouched; double-clicked menu buttons hit this path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen by the player
    Paused,
    /// Run ended (no lives left)
    GameOver,
    /// Wave cleared, short rest before the next wave moves
    LevelComplete,
}

impl Phase {
    /// Phases reachable from `self`
    pub fn allowed_targets(self) -> &'static [Phase] {
        match self {
            Phase::Menu => &[Phase::Playing],
            Phase::Playing => &[Phase::Paused, Phase::GameOver, Phase::LevelComplete],
            Phase::Paused => &[Phase::Playing, Phase::Menu],
            Phase::GameOver => &[Phase::Menu],
            Phase::LevelComplete => &[Phase::Playing, Phase::Menu],
        }
    }

    pub fn can_transition_to(self, to: Phase) -> bool {
        self.allowed_targets().contains(&to)
    }
}

/// An accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// Clock reading when the transition happened
    pub timestamp_ms: u64,
}

/// A transition the table does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: Phase,
    pub to: Phase,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase transition {:?} -> {:?} is not allowed", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

type Observer = Box<dyn FnMut(&Transition)>;

/// Phase tracker with history and synchronous observers
#[derive(Default)]
pub struct PhaseMachine {
    current: Phase,
    previous: Option<Phase>,
    history: Vec<Transition>,
    observers: Vec<Observer>,
}

impl fmt::Debug for PhaseMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn previous(&self) -> Option<Phase> {
        self.previous
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub fn is(&self, phase: Phase) -> bool {
        self.current == phase
    }

    pub fn can_transition_to(&self, to: Phase) -> bool {
        self.current.can_transition_to(to)
    }

    /// Register a callback run after every accepted transition
    pub fn subscribe(&mut self, observer: impl FnMut(&Transition) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Move to `to` if the table allows it
    pub fn transition_to(&mut self, to: Phase, now_ms: u64) -> Result<Transition, TransitionError> {
        let from = self.current;
        if !from.can_transition_to(to) {
            log::debug!("Rejected phase transition {:?} -> {:?}", from, to);
            return Err(TransitionError { from, to });
        }

        let transition = Transition {
            from,
            to,
            timestamp_ms: now_ms,
        };
        self.previous = Some(from);
        self.current = to;
        self.history.push(transition);
        log::debug!("Phase {:?} -> {:?}", from, to);

        for observer in &mut self.observers {
            observer(&transition);
        }
        Ok(transition)
    }

    /// Return to the previous phase, if the table allows it
    pub fn back(&mut self, now_ms: u64) -> Result<Transition, TransitionError> {
        match self.previous {
            Some(prev) => self.transition_to(prev, now_ms),
            None => Err(TransitionError {
                from: self.current,
                to: self.current,
            }),
        }
    }
}
