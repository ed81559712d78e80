mod config;
pub mod database;
pub mod flags;

pub use config::{CalendarConfig, Config, UnlockConfig};
pub use database::Database;
pub use flags::{FlagStore, MemoryFlagStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding the database and config file.
///
/// `CRAVELOG_DATA_DIR` wins when set. Otherwise `~/.config/cravelog[-dev]/`
/// based on CRAVELOG_ENV; set CRAVELOG_ENV=dev to use the development
/// directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("CRAVELOG_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CRAVELOG_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("cravelog-dev")
            } else {
                base_dir.join("cravelog")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
