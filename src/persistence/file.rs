//! JSON file high score store (native)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{HighScoreRecord, HighScoreStore};

/// Stores `{"high_score": N}` at a path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<f64> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("scores: failed to read {}", self.path.display()))?;
        HighScoreRecord::from_json(&json)
            .with_context(|| format!("scores: invalid record in {}", self.path.display()))
    }

    fn write(&self, value: f64) -> Result<()> {
        let json = HighScoreRecord::to_json(value)?;
        // Write then rename so a crash never leaves a torn file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("scores: failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("scores: failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> f64 {
        if !self.path.exists() {
            log::info!("No high score found, starting fresh");
            return 0.0;
        }
        match self.read() {
            Ok(value) => {
                log::info!("Loaded high score {}", value);
                value
            }
            Err(e) => {
                log::warn!("{:#}", e);
                0.0
            }
        }
    }

    fn store(&mut self, value: f64) {
        if let Err(e) = self.write(value) {
            log::warn!("{:#}", e);
        }
    }
}
