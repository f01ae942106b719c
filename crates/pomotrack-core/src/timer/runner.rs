//! Tick-driven interval runner.
//!
//! One `run` call owns an interval from entry until it is done, cancelled
//! or observed paused. Three sources compete at a single wait point:
//!
//! - a one-second ticker that re-reads the interval and adds a second,
//! - a one-shot expiry deadline fixed at entry from the remaining time,
//! - the caller's cancellation token.
//!
//! Exactly one source is handled per iteration. When several are ready at
//! once the order is cancellation, expiry, tick; the first two end the loop,
//! so the ticker never starves. The ticker and the deadline are dropped on
//! every exit path together with the future.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::interval::{Interval, IntervalConfig, IntervalState};
use crate::error::{CoreError, Result};

pub const TICK: Duration = Duration::from_secs(1);

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Planned duration reached; the interval is `Done`.
    Completed,
    /// The interval was found paused on a tick.
    Paused,
    /// The cancellation token fired; the interval is `Cancelled`.
    Cancelled,
    /// `start` was called on an interval that is already running.
    AlreadyRunning,
}

/// Drive interval `id` until expiry, cancellation or an observed pause.
///
/// Hooks run inline on the caller's task and receive a snapshot of the
/// interval. Storage errors abort the loop and are returned unchanged;
/// progress written before the failure is kept.
///
/// Repository calls are synchronous and block the runner's task while they
/// execute.
///
/// A `Done` or `Cancelled` interval is rejected with `IntervalCompleted`
/// before `on_start`. If another writer settles the interval mid-run, the
/// next event returns without writing over it.
pub async fn run<S, T, E>(
    id: i64,
    config: &IntervalConfig,
    cancel: &CancellationToken,
    mut on_start: S,
    mut on_tick: T,
    mut on_complete: E,
) -> Result<RunOutcome>
where
    S: FnMut(&Interval),
    T: FnMut(&Interval),
    E: FnMut(&Interval),
{
    let repo = config.repo();
    let interval = repo.by_id(id)?;

    if interval.state.is_terminal() {
        return Err(CoreError::IntervalCompleted { id });
    }
    if interval.actual_duration > interval.planned_duration {
        return Err(CoreError::InvalidState(format!(
            "interval {id} has run {:?} of a planned {:?}",
            interval.actual_duration, interval.planned_duration
        )));
    }

    let started = Instant::now();
    let expire = time::sleep_until(started + interval.remaining());
    tokio::pin!(expire);

    let mut ticker = time::interval_at(started + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        id,
        category = %interval.category,
        remaining_secs = interval.remaining().as_secs(),
        "interval run started"
    );
    on_start(&interval);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                let mut interval = repo.by_id(id)?;
                if let Some(outcome) = settled(&interval) {
                    return Ok(outcome);
                }
                interval.state = IntervalState::Cancelled;
                repo.update(&interval)?;
                tracing::info!(id, actual_secs = interval.actual_duration.as_secs(), "interval cancelled");
                return Ok(RunOutcome::Cancelled);
            }

            _ = &mut expire => {
                let mut interval = repo.by_id(id)?;
                if let Some(outcome) = settled(&interval) {
                    return Ok(outcome);
                }
                interval.state = IntervalState::Done;
                interval.actual_duration = interval.actual_duration.max(interval.planned_duration);
                on_complete(&interval);
                repo.update(&interval)?;
                tracing::info!(id, category = %interval.category, "interval done");
                return Ok(RunOutcome::Completed);
            }

            _ = ticker.tick() => {
                let mut interval = repo.by_id(id)?;
                if let Some(outcome) = settled(&interval) {
                    return Ok(outcome);
                }
                if interval.state == IntervalState::Paused {
                    tracing::info!(id, actual_secs = interval.actual_duration.as_secs(), "interval paused");
                    return Ok(RunOutcome::Paused);
                }

                interval.actual_duration = (interval.actual_duration + TICK).min(interval.planned_duration);
                if let Err(e) = repo.update(&interval) {
                    tracing::warn!(id, error = %e, "failed to persist tick");
                    return Err(e);
                }
                tracing::debug!(id, actual_secs = interval.actual_duration.as_secs(), "tick");
                on_tick(&interval);
            }
        }
    }
}

/// Outcome for an interval some other writer already finished.
fn settled(interval: &Interval) -> Option<RunOutcome> {
    match interval.state {
        IntervalState::Done => Some(RunOutcome::Completed),
        IntervalState::Cancelled => Some(RunOutcome::Cancelled),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryRepository, Repository};
    use crate::timer::Category;

    fn setup(planned: u64) -> (Arc<MemoryRepository>, IntervalConfig, i64) {
        let repo = Arc::new(MemoryRepository::new());
        let config = IntervalConfig::with_defaults(repo.clone());
        let mut interval = Interval::new(Category::Pomodoro, Duration::from_secs(planned));
        interval.state = IntervalState::Running;
        let id = repo.create(&interval).unwrap();
        (repo, config, id)
    }

    #[tokio::test(start_paused = true)]
    async fn three_second_interval_ticks_twice_then_completes() {
        let (repo, config, id) = setup(3);
        let cancel = CancellationToken::new();

        let mut starts = 0;
        let mut ticks = Vec::new();
        let mut completed = None;
        let outcome = run(
            id,
            &config,
            &cancel,
            |_| starts += 1,
            |i| ticks.push(i.actual_duration.as_secs()),
            |i| completed = Some(i.clone()),
        )
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(starts, 1);
        assert_eq!(ticks, vec![1, 2]);
        let completed = completed.unwrap();
        assert_eq!(completed.state, IntervalState::Done);
        assert_eq!(completed.actual_duration, completed.planned_duration);
        assert_eq!(repo.by_id(id).unwrap(), completed);
    }

    #[tokio::test(start_paused = true)]
    async fn resumes_from_stored_progress() {
        let (repo, config, id) = setup(5);
        let mut interval = repo.by_id(id).unwrap();
        interval.actual_duration = Duration::from_secs(3);
        repo.update(&interval).unwrap();

        let mut ticks = Vec::new();
        let outcome = run(
            id,
            &config,
            &CancellationToken::new(),
            |_| {},
            |i| ticks.push(i.actual_duration.as_secs()),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(ticks, vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn overrun_interval_is_rejected() {
        let (repo, config, id) = setup(2);
        let mut interval = repo.by_id(id).unwrap();
        interval.actual_duration = Duration::from_secs(4);
        repo.update(&interval).unwrap();

        let err = run(id, &config, &CancellationToken::new(), |_| {}, |_| {}, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_id_fails_before_start_hook() {
        let (_repo, config, _) = setup(2);
        let mut started = false;
        let err = run(42, &config, &CancellationToken::new(), |_| started = true, |_| {}, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidId(42)));
        assert!(!started);
    }
}
