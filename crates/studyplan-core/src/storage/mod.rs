//! Persistence: SQLite database, TOML configuration, reactive queries.

mod config;
pub mod database;
pub mod observe;

pub use config::{Config, PomodoroConfig, TimerConfig};
pub use database::Database;
pub use observe::WatchedStore;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `STUDYPLAN_DATA_DIR` overrides the location entirely (used by tests).
/// Otherwise resolves to `~/.config/studyplan[-dev]/` based on
/// `STUDYPLAN_ENV` (set `STUDYPLAN_ENV=dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = if let Ok(dir) = std::env::var("STUDYPLAN_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("STUDYPLAN_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("studyplan-dev")
        } else {
            base_dir.join("studyplan")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
