//! Signal handling for countdown cancellation
//!
//! SIGINT and SIGTERM are the terminal counterpart of a cancel button: the
//! front-end cancels the running countdown when either arrives.

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for a cancel signal (SIGTERM, SIGINT); returns the signal number.
pub async fn shutdown_signal() -> Option<i32> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .expect("Failed to create signal handler");

    let signal = signals.next().await;
    if let Some(signal) = signal {
        info!("Received signal: {}", signal);
    }
    signal
}
