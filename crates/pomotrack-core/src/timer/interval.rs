//! Interval data model.
//!
//! ## State Transitions
//!
//! ```text
//! NotStarted -> Running -> (Done | Cancelled)
//!               Running <-> Paused
//! ```
//!
//! `Done` and `Cancelled` are terminal.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::storage::Repository;

pub const DEFAULT_POMODORO: Duration = Duration::from_secs(25 * 60);
pub const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_LONG_BREAK: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Category {
    pub fn is_break(self) -> bool {
        matches!(self, Category::ShortBreak | Category::LongBreak)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pomodoro => "Pomodoro",
            Category::ShortBreak => "ShortBreak",
            Category::LongBreak => "LongBreak",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pomodoro" => Ok(Category::Pomodoro),
            "ShortBreak" => Ok(Category::ShortBreak),
            "LongBreak" => Ok(Category::LongBreak),
            other => Err(CoreError::InvalidState(format!("unknown category '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    NotStarted,
    Running,
    Paused,
    Done,
    Cancelled,
}

impl IntervalState {
    /// Whether the interval can never run again.
    pub fn is_terminal(self) -> bool {
        matches!(self, IntervalState::Done | IntervalState::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalState::NotStarted => "not_started",
            IntervalState::Running => "running",
            IntervalState::Paused => "paused",
            IntervalState::Done => "done",
            IntervalState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for IntervalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(IntervalState::NotStarted),
            "running" => Ok(IntervalState::Running),
            "paused" => Ok(IntervalState::Paused),
            "done" => Ok(IntervalState::Done),
            "cancelled" => Ok(IntervalState::Cancelled),
            other => Err(CoreError::InvalidState(format!("unknown state '{other}'"))),
        }
    }
}

/// One work or break session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Assigned by the repository on creation. Zero until then.
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub planned_duration: Duration,
    pub actual_duration: Duration,
    pub category: Category,
    pub state: IntervalState,
}

impl Interval {
    /// A fresh, unsaved interval.
    pub fn new(category: Category, planned_duration: Duration) -> Self {
        Self {
            id: 0,
            start_time: Utc::now(),
            planned_duration,
            actual_duration: Duration::ZERO,
            category,
            state: IntervalState::NotStarted,
        }
    }

    /// Time left before expiry. Zero once the planned duration is reached.
    pub fn remaining(&self) -> Duration {
        self.planned_duration.saturating_sub(self.actual_duration)
    }
}

/// Durations for each category plus the repository they are applied through.
///
/// Read-only once constructed.
#[derive(Clone)]
pub struct IntervalConfig {
    repo: Arc<dyn Repository>,
    pub pomodoro_duration: Duration,
    pub short_break_duration: Duration,
    pub long_break_duration: Duration,
}

impl IntervalConfig {
    /// Zero durations fall back to the defaults (25/5/15 minutes).
    pub fn new(
        repo: Arc<dyn Repository>,
        pomodoro: Duration,
        short_break: Duration,
        long_break: Duration,
    ) -> Self {
        let or_default = |d: Duration, default: Duration| if d.is_zero() { default } else { d };
        Self {
            repo,
            pomodoro_duration: or_default(pomodoro, DEFAULT_POMODORO),
            short_break_duration: or_default(short_break, DEFAULT_SHORT_BREAK),
            long_break_duration: or_default(long_break, DEFAULT_LONG_BREAK),
        }
    }

    /// Config with default durations.
    pub fn with_defaults(repo: Arc<dyn Repository>) -> Self {
        Self::new(repo, Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub fn repo(&self) -> &dyn Repository {
        self.repo.as_ref()
    }

    pub fn duration_for(&self, category: Category) -> Duration {
        match category {
            Category::Pomodoro => self.pomodoro_duration,
            Category::ShortBreak => self.short_break_duration,
            Category::LongBreak => self.long_break_duration,
        }
    }
}

impl fmt::Debug for IntervalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalConfig")
            .field("pomodoro_duration", &self.pomodoro_duration)
            .field("short_break_duration", &self.short_break_duration)
            .field("long_break_duration", &self.long_break_duration)
            .finish_non_exhaustive()
    }
}
