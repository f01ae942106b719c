//! Category rotation.
//!
//! Work always follows a break. After work, a long break is due once three
//! short breaks have passed since the last long break; otherwise the break
//! is short. Only the last interval and the last three breaks are consulted.

use super::interval::Category;
use crate::error::{CoreError, Result};
use crate::storage::Repository;

/// Number of recent breaks inspected when deciding on a long break.
const BREAK_LOOKBACK: usize = 3;

/// Decide the category of the next interval from the stored history.
pub fn next_category(repo: &dyn Repository) -> Result<Category> {
    let last = match repo.last() {
        Ok(interval) => interval,
        Err(CoreError::NoIntervals) => return Ok(Category::Pomodoro),
        Err(e) => return Err(e),
    };

    if last.category.is_break() {
        return Ok(Category::Pomodoro);
    }

    let breaks = repo.breaks(BREAK_LOOKBACK)?;
    if breaks.len() < BREAK_LOOKBACK {
        return Ok(Category::ShortBreak);
    }

    if breaks.iter().any(|b| b.category == Category::LongBreak) {
        return Ok(Category::ShortBreak);
    }

    Ok(Category::LongBreak)
}
