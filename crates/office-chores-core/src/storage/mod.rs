mod config;
pub mod store;

pub use config::{CalendarConfig, Config, RecurrenceConfig, RemindersConfig, SummaryConfig};
pub use store::{ChoreStore, KeyValueStore, SqliteStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `OFFICE_CHORES_DATA_DIR` wins when set. Otherwise
/// `~/.config/office-chores[-dev]/`, with the `-dev` suffix when
/// `OFFICE_CHORES_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("OFFICE_CHORES_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("OFFICE_CHORES_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("office-chores-dev")
            } else {
                base_dir.join("office-chores")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
