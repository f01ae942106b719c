//! In-memory repository for tests and throwaway sessions.

use std::sync::{Mutex, MutexGuard};

use super::Repository;
use crate::error::{CoreError, Result};
use crate::timer::Interval;

/// Intervals kept in creation order; id is the position plus one.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    intervals: Mutex<Vec<Interval>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Interval>> {
        // Writes are single assignments, so a poisoned lock still holds whole intervals.
        self.intervals
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn index(id: i64, len: usize) -> Result<usize> {
        usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .filter(|&i| i < len)
            .ok_or(CoreError::InvalidId(id))
    }
}

impl Repository for MemoryRepository {
    fn create(&self, interval: &Interval) -> Result<i64> {
        let mut intervals = self.lock();
        let id = intervals.len() as i64 + 1;
        let mut stored = interval.clone();
        stored.id = id;
        intervals.push(stored);
        Ok(id)
    }

    fn update(&self, interval: &Interval) -> Result<()> {
        let mut intervals = self.lock();
        let idx = Self::index(interval.id, intervals.len())?;
        intervals[idx] = interval.clone();
        Ok(())
    }

    fn by_id(&self, id: i64) -> Result<Interval> {
        let intervals = self.lock();
        let idx = Self::index(id, intervals.len())?;
        Ok(intervals[idx].clone())
    }

    fn last(&self) -> Result<Interval> {
        self.lock().last().cloned().ok_or(CoreError::NoIntervals)
    }

    fn breaks(&self, n: usize) -> Result<Vec<Interval>> {
        Ok(self
            .lock()
            .iter()
            .rev()
            .filter(|i| i.category.is_break())
            .take(n)
            .cloned()
            .collect())
    }
}
