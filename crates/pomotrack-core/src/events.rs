use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Category, Interval, IntervalState};

/// Every observable step of an interval run produces an Event.
/// The CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    IntervalStarted {
        id: i64,
        category: Category,
        planned_secs: u64,
        actual_secs: u64,
        at: DateTime<Utc>,
    },
    IntervalTicked {
        id: i64,
        category: Category,
        remaining_secs: u64,
        actual_secs: u64,
        at: DateTime<Utc>,
    },
    IntervalCompleted {
        id: i64,
        category: Category,
        actual_secs: u64,
        at: DateTime<Utc>,
    },
    IntervalPaused {
        id: i64,
        actual_secs: u64,
        at: DateTime<Utc>,
    },
    IntervalCancelled {
        id: i64,
        actual_secs: u64,
        at: DateTime<Utc>,
    },
    /// Full snapshot of a stored interval.
    IntervalSnapshot {
        id: i64,
        category: Category,
        state: IntervalState,
        start_time: DateTime<Utc>,
        planned_secs: u64,
        actual_secs: u64,
    },
}

impl Event {
    pub fn started(interval: &Interval) -> Self {
        Event::IntervalStarted {
            id: interval.id,
            category: interval.category,
            planned_secs: interval.planned_duration.as_secs(),
            actual_secs: interval.actual_duration.as_secs(),
            at: Utc::now(),
        }
    }

    pub fn ticked(interval: &Interval) -> Self {
        Event::IntervalTicked {
            id: interval.id,
            category: interval.category,
            remaining_secs: interval.remaining().as_secs(),
            actual_secs: interval.actual_duration.as_secs(),
            at: Utc::now(),
        }
    }

    pub fn completed(interval: &Interval) -> Self {
        Event::IntervalCompleted {
            id: interval.id,
            category: interval.category,
            actual_secs: interval.actual_duration.as_secs(),
            at: Utc::now(),
        }
    }

    /// Terminal event for a stored interval after its runner returned.
    /// `None` while the interval can still run.
    pub fn stopped(interval: &Interval) -> Option<Self> {
        let id = interval.id;
        let actual_secs = interval.actual_duration.as_secs();
        let at = Utc::now();
        match interval.state {
            IntervalState::Paused => Some(Event::IntervalPaused { id, actual_secs, at }),
            IntervalState::Cancelled => Some(Event::IntervalCancelled { id, actual_secs, at }),
            _ => None,
        }
    }

    pub fn snapshot(interval: &Interval) -> Self {
        Event::IntervalSnapshot {
            id: interval.id,
            category: interval.category,
            state: interval.state,
            start_time: interval.start_time,
            planned_secs: interval.planned_duration.as_secs(),
            actual_secs: interval.actual_duration.as_secs(),
        }
    }
}
