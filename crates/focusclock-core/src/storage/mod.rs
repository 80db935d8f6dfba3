mod config;

pub use config::{Config, LogConfig, TickerConfig};

use std::path::PathBuf;

/// Returns `~/.config/focusclock[-dev]/` based on FOCUSCLOCK_ENV.
///
/// Set FOCUSCLOCK_ENV=dev to use the development config directory. The
/// directory is created lazily by [`Config::save_to`].
pub fn data_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSCLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("focusclock-dev")
    } else {
        base_dir.join("focusclock")
    }
}
