//! Monotonic clocks
//!
//! The simulation never reads wall time directly. Shot cooldowns and phase
//! history take their timestamps from an injected `Clock`, so tests can
//! drive time by hand.

use std::cell::Cell;
use std::rc::Rc;

/// Source of monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    start: f64,
}

impl SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// `Instant` is unavailable in the browser; Date.now() is used instead
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {
            start: js_sys::Date::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> u64 {
        (js_sys::Date::now() - self.start).max(0.0) as u64
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms.max(self.now.get()));
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
