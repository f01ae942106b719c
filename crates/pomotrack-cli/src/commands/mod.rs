pub mod config;
pub mod interval;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use pomotrack_core::{IntervalConfig, Repository, Settings, SqliteRepository};

/// Per-invocation duration overrides, in minutes.
#[derive(Args, Debug, Default)]
pub struct DurationArgs {
    /// Pomodoro duration in minutes
    #[arg(long, global = true)]
    pub pomodoro: Option<u64>,
    /// Short break duration in minutes
    #[arg(long, global = true)]
    pub short_break: Option<u64>,
    /// Long break duration in minutes
    #[arg(long, global = true)]
    pub long_break: Option<u64>,
}

/// Global options shared by every command.
pub struct Context {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub durations: DurationArgs,
}

impl Context {
    pub fn load_settings(&self) -> pomotrack_core::Result<Settings> {
        match &self.config {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> pomotrack_core::Result<()> {
        match &self.config {
            Some(path) => settings.save_to(path),
            None => settings.save(),
        }
    }

    fn open_repo(&self) -> pomotrack_core::Result<Arc<dyn Repository>> {
        let repo = match &self.db {
            Some(path) => SqliteRepository::open(path)?,
            None => SqliteRepository::open_default()?,
        };
        Ok(Arc::new(repo))
    }

    /// Settings plus command-line overrides, bound to the interval database.
    pub fn interval_config(&self) -> pomotrack_core::Result<IntervalConfig> {
        let mut settings = self.load_settings()?;
        let d = &mut settings.durations;
        if let Some(m) = self.durations.pomodoro {
            d.pomodoro = m;
        }
        if let Some(m) = self.durations.short_break {
            d.short_break = m;
        }
        if let Some(m) = self.durations.long_break {
            d.long_break = m;
        }
        Ok(settings.interval_config(self.open_repo()?))
    }
}
