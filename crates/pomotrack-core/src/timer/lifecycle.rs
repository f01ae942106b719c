//! Creating, starting and pausing intervals.

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::category::next_category;
use super::interval::{Interval, IntervalConfig, IntervalState};
use super::runner::{run, RunOutcome};
use crate::error::{CoreError, Result};

/// Create and store the next interval in the rotation.
pub fn new_interval(config: &IntervalConfig) -> Result<Interval> {
    let category = next_category(config.repo())?;
    let mut interval = Interval::new(category, config.duration_for(category));
    interval.id = config.repo().create(&interval)?;
    tracing::debug!(id = interval.id, %category, "created interval");
    Ok(interval)
}

/// The last interval if it can still run, otherwise a new one.
pub fn current_interval(config: &IntervalConfig) -> Result<Interval> {
    match config.repo().last() {
        Ok(last) if !last.state.is_terminal() => Ok(last),
        Ok(_) | Err(CoreError::NoIntervals) => new_interval(config),
        Err(e) => Err(e),
    }
}

/// Start or resume `interval` and run it.
///
/// A running interval is left alone; its runner is assumed to be live
/// elsewhere.
pub async fn start<S, T, E>(
    mut interval: Interval,
    config: &IntervalConfig,
    cancel: &CancellationToken,
    on_start: S,
    on_tick: T,
    on_complete: E,
) -> Result<RunOutcome>
where
    S: FnMut(&Interval),
    T: FnMut(&Interval),
    E: FnMut(&Interval),
{
    match interval.state {
        IntervalState::Running => return Ok(RunOutcome::AlreadyRunning),
        IntervalState::Done | IntervalState::Cancelled => {
            return Err(CoreError::IntervalCompleted { id: interval.id })
        }
        IntervalState::NotStarted => interval.start_time = Utc::now(),
        IntervalState::Paused => {}
    }

    interval.state = IntervalState::Running;
    config.repo().update(&interval)?;
    run(interval.id, config, cancel, on_start, on_tick, on_complete).await
}

/// Mark a running interval as paused. Its runner stops on the next tick.
pub fn pause(mut interval: Interval, config: &IntervalConfig) -> Result<Interval> {
    if interval.state != IntervalState::Running {
        return Err(CoreError::IntervalNotRunning);
    }
    interval.state = IntervalState::Paused;
    config.repo().update(&interval)?;
    tracing::info!(id = interval.id, "pause requested");
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::storage::{MemoryRepository, Repository};
    use crate::timer::Category;

    fn config() -> (Arc<MemoryRepository>, IntervalConfig) {
        let repo = Arc::new(MemoryRepository::new());
        let config = IntervalConfig::new(
            repo.clone(),
            Duration::from_secs(3),
            Duration::from_secs(2),
            Duration::from_secs(4),
        );
        (repo, config)
    }

    #[test]
    fn new_interval_uses_rotation_and_configured_duration() {
        let (repo, config) = config();
        let first = new_interval(&config).unwrap();
        assert_eq!(first.category, Category::Pomodoro);
        assert_eq!(first.planned_duration, Duration::from_secs(3));
        assert_eq!(first.state, IntervalState::NotStarted);
        assert_eq!(repo.by_id(first.id).unwrap(), first);

        let second = new_interval(&config).unwrap();
        assert_eq!(second.category, Category::ShortBreak);
        assert_eq!(second.planned_duration, Duration::from_secs(2));
    }

    #[test]
    fn current_interval_reuses_unfinished_one() {
        let (repo, config) = config();
        let first = current_interval(&config).unwrap();
        assert_eq!(current_interval(&config).unwrap().id, first.id);

        let mut done = first.clone();
        done.state = IntervalState::Done;
        repo.update(&done).unwrap();
        let next = current_interval(&config).unwrap();
        assert_ne!(next.id, first.id);
        assert_eq!(next.category, Category::ShortBreak);
    }

    #[test]
    fn pause_requires_running() {
        let (_repo, config) = config();
        let interval = new_interval(&config).unwrap();
        assert!(matches!(
            pause(interval, &config),
            Err(CoreError::IntervalNotRunning)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn start_rejects_terminal_intervals() {
        let (repo, config) = config();
        let mut interval = new_interval(&config).unwrap();
        interval.state = IntervalState::Cancelled;
        repo.update(&interval).unwrap();

        let err = start(interval.clone(), &config, &CancellationToken::new(), |_| {}, |_| {}, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::IntervalCompleted { id } if id == interval.id));
    }

    #[tokio::test(start_paused = true)]
    async fn start_on_running_interval_is_a_no_op() {
        let (repo, config) = config();
        let mut interval = new_interval(&config).unwrap();
        interval.state = IntervalState::Running;
        repo.update(&interval).unwrap();

        let outcome = start(interval, &config, &CancellationToken::new(), |_| {}, |_| {}, |_| {})
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::AlreadyRunning);
    }

    #[tokio::test(start_paused = true)]
    async fn start_runs_new_interval_to_completion() {
        let (repo, config) = config();
        let interval = new_interval(&config).unwrap();
        let id = interval.id;

        let outcome = start(interval, &config, &CancellationToken::new(), |_| {}, |_| {}, |_| {})
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let stored = repo.by_id(id).unwrap();
        assert_eq!(stored.state, IntervalState::Done);
        assert_eq!(stored.actual_duration, Duration::from_secs(3));
    }
}
