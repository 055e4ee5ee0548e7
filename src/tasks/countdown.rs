//! Countdown background task

use std::{sync::Arc, time::Duration};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{interval, Instant};
use tracing::{debug, error, info, warn};

use crate::duration::SleepDuration;
use crate::state::{controller::Command, CountdownController, CountdownState, Phase};

/// Background task that owns every countdown state transition.
///
/// Waits for a start command, then drives the armed countdown until it
/// expires, is cancelled, or is re-armed. Commands and ticks are serialized
/// through one loop, so once a cancel is processed nothing can fire.
pub async fn countdown_task(
    controller: Arc<CountdownController>,
    mut commands: broadcast::Receiver<Command>,
) {
    info!("Starting countdown task");

    loop {
        match commands.recv().await {
            Ok(Command::Start(duration)) => {
                run_countdown(&controller, &mut commands, duration).await;
            }
            Ok(Command::Cancel) => {
                debug!("Cancel received with no countdown armed");
            }
            Err(RecvError::Closed) => {
                debug!("Command channel closed, stopping countdown task");
                break;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Countdown task lagged, skipped {} commands", skipped);
            }
        }
    }
}

/// Drive one armed countdown to its end.
///
/// A single deadline-based schedule: the one-second tick that refreshes the
/// displayed remaining time is also the tick that detects expiry, so the
/// display and the sleep request cannot drift apart.
async fn run_countdown(
    controller: &Arc<CountdownController>,
    commands: &mut broadcast::Receiver<Command>,
    mut duration: SleepDuration,
) {
    'arm: loop {
        info!("Setting timer for {}", duration);

        let deadline = Instant::now() + duration.as_std();
        if let Err(e) = controller.replace_state(CountdownState::armed(duration)) {
            error!("Failed to publish armed state: {}", e);
            return;
        }

        let mut ticker = interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    if now >= deadline {
                        expire(controller).await;
                        return;
                    }

                    // Round to the nearest whole second so tick jitter does
                    // not skip a display step.
                    let remaining = deadline.saturating_duration_since(now)
                        + Duration::from_millis(500);
                    let remaining_seconds = remaining.as_secs();

                    if let Err(e) = controller.update_state(|state| {
                        state.remaining_seconds = remaining_seconds;
                    }) {
                        error!("Failed to update remaining time: {}", e);
                    }
                }

                cmd = commands.recv() => match cmd {
                    Ok(Command::Cancel) => {
                        info!("Countdown cancelled");
                        cancel(controller);
                        return;
                    }
                    Ok(Command::Start(new_duration)) => {
                        info!("Countdown re-armed while running");
                        duration = new_duration;
                        continue 'arm;
                    }
                    Err(RecvError::Closed) => {
                        debug!("Command channel closed mid-countdown");
                        return;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Countdown task lagged, skipped {} commands", skipped);
                    }
                },
            }
        }
    }
}

/// Natural expiry: show zero, request sleep, settle in `Expired`.
///
/// The `Expired` snapshot is published only after the sleep request has
/// settled. A failed request is logged and recorded on the state; the phase
/// stays `Expired`.
async fn expire(controller: &Arc<CountdownController>) {
    if let Err(e) = controller.update_state(|state| state.remaining_seconds = 0) {
        error!("Failed to publish final tick: {}", e);
    }

    info!("Countdown expired, requesting system sleep");
    let outcome = controller.request_sleep().await;

    if let Err(e) = &outcome {
        error!("System sleep request failed: {}", e);
    }

    if let Err(e) = controller.update_state(|state| {
        state.phase = Phase::Expired;
        state.remaining_seconds = 0;
        if let Err(sleep_error) = &outcome {
            state.add_error(format!("System sleep request failed: {}", sleep_error));
        }
    }) {
        error!("Failed to publish expired state: {}", e);
    }
}

/// Cancellation: publish `Cancelled` with default fields, then settle idle.
fn cancel(controller: &Arc<CountdownController>) {
    let mut cancelled = CountdownState::idle();
    cancelled.phase = Phase::Cancelled;

    if let Err(e) = controller.replace_state(cancelled) {
        error!("Failed to publish cancelled state: {}", e);
    }

    if let Err(e) = controller.update_state(|state| state.phase = Phase::Idle) {
        error!("Failed to publish idle state: {}", e);
    }
}
