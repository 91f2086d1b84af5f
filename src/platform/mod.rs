//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic milliseconds for cooldowns and phase history)
//! - Logging back-end setup

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// Install the log back-end for this platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}

/// Install the log back-end for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // RUST_LOG overrides the default level
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
