//! # pomotrack Core Library
//!
//! Tracks a rotation of Pomodoro work and break intervals and drives the
//! running interval one second at a time.
//!
//! ## Architecture
//!
//! - **Timer**: the category rotation ([`next_category`]), the async tick
//!   runner ([`run`]) and the start/pause lifecycle around it
//! - **Storage**: the [`Repository`] trait with in-memory and SQLite
//!   implementations, plus TOML [`Settings`]
//! - **Events**: JSON-serializable records of each observable step
//!
//! ## Usage
//!
//! ```ignore
//! let repo = Arc::new(SqliteRepository::open_default()?);
//! let config = Settings::load()?.interval_config(repo);
//! let interval = current_interval(&config)?;
//! start(interval, &config, &cancel, on_start, on_tick, on_complete).await?;
//! ```

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, Result};
pub use events::Event;
pub use storage::{MemoryRepository, Repository, Settings, SqliteRepository};
pub use timer::{
    current_interval, new_interval, next_category, pause, run, start, Category, Interval,
    IntervalConfig, IntervalState, RunOutcome,
};
