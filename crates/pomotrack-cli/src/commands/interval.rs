use pomotrack_core::{CoreError, Event, Interval, RunOutcome};
use tokio_util::sync::CancellationToken;

use super::Context;

fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
    }
}

pub async fn start(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.interval_config()?;
    let interval = pomotrack_core::current_interval(&config)?;
    let id = interval.id;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = pomotrack_core::start(
        interval,
        &config,
        &cancel,
        |i: &Interval| print_event(&Event::started(i)),
        |i: &Interval| print_event(&Event::ticked(i)),
        |i: &Interval| print_event(&Event::completed(i)),
    )
    .await;
    ctrl_c.abort();

    match outcome? {
        RunOutcome::Completed => {}
        RunOutcome::Paused | RunOutcome::Cancelled => {
            if let Some(event) = Event::stopped(&config.repo().by_id(id)?) {
                print_event(&event);
            }
        }
        RunOutcome::AlreadyRunning => {
            eprintln!("interval {id} is already running; pause it first to take it over");
        }
    }
    Ok(())
}

pub fn pause(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.interval_config()?;
    let last = config.repo().last()?;
    let paused = pomotrack_core::pause(last, &config)?;
    print_event(&Event::snapshot(&paused));
    Ok(())
}

pub fn status(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.interval_config()?;
    match config.repo().last() {
        Ok(last) => print_event(&Event::snapshot(&last)),
        Err(CoreError::NoIntervals) => println!("{{\"type\": \"none\"}}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn next(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.interval_config()?;
    let category = pomotrack_core::next_category(config.repo())?;
    println!("{category}");
    Ok(())
}
