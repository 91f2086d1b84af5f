//! High score persistence
//!
//! The core reads the high score once when a session is created and writes
//! it on every new record. Back-ends:
//! - `MemoryStore`: in-process (tests, headless runs)
//! - `JsonFileStore`: JSON file on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Stores never fail the game: I/O problems are logged and read as 0.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::sim::state::sanitize_score;

/// Persistence collaborator for the single high score value
pub trait HighScoreStore {
    /// Stored high score, 0 when nothing is stored
    fn load(&mut self) -> f64;
    /// Replace the stored high score
    fn store(&mut self, value: f64);
}

/// On-disk/LocalStorage record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: f64,
}

impl HighScoreRecord {
    pub fn from_json(json: &str) -> anyhow::Result<f64> {
        let record: HighScoreRecord = serde_json::from_str(json)?;
        Ok(sanitize_score(record.high_score))
    }

    pub fn to_json(value: f64) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&HighScoreRecord {
            high_score: sanitize_score(value),
        })?)
    }
}

/// In-memory store; clones share the value
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<f64>>,
    writes: Rc<Cell<u32>>,
}

impl MemoryStore {
    pub fn new(initial: f64) -> Self {
        Self {
            value: Rc::new(Cell::new(sanitize_score(initial))),
            writes: Rc::new(Cell::new(0)),
        }
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Number of `store` calls so far
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> f64 {
        self.value.get()
    }

    fn store(&mut self, value: f64) {
        self.value.set(sanitize_score(value));
        self.writes.set(self.writes.get() + 1);
    }
}
