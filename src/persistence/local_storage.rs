//! Browser LocalStorage high score store (wasm32)

use super::{HighScoreRecord, HighScoreStore};

/// Stores the high score record under one LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    /// LocalStorage key used by the game
    pub const DEFAULT_KEY: &'static str = "star_swarm_high_score";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> f64 {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(&self.key) {
                match HighScoreRecord::from_json(&json) {
                    Ok(value) => {
                        log::info!("Loaded high score {}", value);
                        return value;
                    }
                    Err(e) => log::warn!("Ignoring stored high score: {:#}", e),
                }
            }
        }

        log::info!("No high score found, starting fresh");
        0.0
    }

    fn store(&mut self, value: f64) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match HighScoreRecord::to_json(value) {
            Ok(json) => {
                if storage.set_item(&self.key, &json).is_err() {
                    log::warn!("High score could not be saved");
                }
            }
            Err(e) => log::warn!("{:#}", e),
        }
    }
}
