mod config;
pub mod database;
pub mod memory;

pub use config::{DurationSettings, Settings};
pub use database::SqliteRepository;
pub use memory::MemoryRepository;

use std::path::PathBuf;

use crate::error::Result;
use crate::timer::Interval;

/// Interval storage.
///
/// The repository is the only owner of interval records. Implementations
/// must be safe to share between a running interval and other callers.
pub trait Repository: Send + Sync {
    /// Store a new interval and return its id.
    fn create(&self, interval: &Interval) -> Result<i64>;

    /// Overwrite the interval with the same id. `InvalidId` if absent.
    fn update(&self, interval: &Interval) -> Result<()>;

    /// `InvalidId` if absent.
    fn by_id(&self, id: i64) -> Result<Interval>;

    /// Most recently created interval. `NoIntervals` if none exist.
    fn last(&self) -> Result<Interval>;

    /// Up to `n` most recent break intervals, newest first.
    fn breaks(&self, n: usize) -> Result<Vec<Interval>>;
}

/// Returns `~/.config/pomotrack[-dev]/` based on POMOTRACK_ENV.
///
/// Set POMOTRACK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotrack-dev")
    } else {
        base_dir.join("pomotrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
