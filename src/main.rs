//! Doze - a countdown timer that puts the machine to sleep
//!
//! This is the main entry point for the doze application.

use std::sync::Arc;

use tracing::info;

use doze::{
    config::Config,
    duration::resolve,
    services::{check_sleep_support, SystemSleep},
    state::{CountdownController, Phase},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("doze={}", config.log_level()))
        .init();

    info!("Starting doze v1.0.0");

    // Check the platform sleep utility before arming anything
    if let Err(e) = check_sleep_support().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let input = config.duration_input();
    let duration = match resolve(&input) {
        Ok(duration) => duration,
        // Bad input is surfaced instead of silently keeping the old value.
        Err(e) => anyhow::bail!("invalid duration: {}", e),
    };

    info!(
        "Configuration: mode={:?}, duration={}, total={}s",
        input.mode(),
        duration,
        duration.total_seconds()
    );

    let controller = CountdownController::new(Arc::new(SystemSleep));
    let task = controller.spawn();
    let mut updates = controller.subscribe();

    controller.start(duration);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();

                if config.json {
                    println!("{}", serde_json::to_string(&state)?);
                } else if state.is_running() {
                    print!("\rRemaining Time: {}", state.formatted_remaining());
                    std::io::Write::flush(&mut std::io::stdout())?;
                }

                // Expired is published after the sleep request settled
                if state.phase == Phase::Expired {
                    if !config.json {
                        println!();
                    }
                    info!("Countdown complete");
                    break;
                }
            }

            _ = &mut shutdown => {
                if !config.json {
                    println!();
                }
                controller.cancel();
                info!("Countdown cancelled, exiting");
                break;
            }
        }
    }

    task.abort();
    Ok(())
}
