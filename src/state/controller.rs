//! Countdown controller
//!
//! The controller is the handle the presentation layer talks to. It owns the
//! channels: commands flow to the countdown task over a broadcast channel,
//! state snapshots flow back over a watch channel. All state mutation
//! happens on the countdown task; `start` and `cancel` only enqueue.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use super::{CountdownState, Phase};
use crate::duration::SleepDuration;
use crate::services::{SleepError, SleepTrigger};
use crate::tasks::countdown_task;

/// Commands delivered to the countdown task.
#[derive(Debug, Clone)]
pub(crate) enum Command {
    Start(SleepDuration),
    Cancel,
}

/// Owns the countdown lifecycle and the channels around it.
pub struct CountdownController {
    /// Latest snapshot, queryable without subscribing
    state: Mutex<CountdownState>,
    /// Command channel into the countdown task
    command_tx: broadcast::Sender<Command>,
    /// State snapshots published to observers
    state_tx: watch::Sender<CountdownState>,
    /// Keep the receiver alive to prevent channel closure
    _state_rx: watch::Receiver<CountdownState>,
    /// The sleep action invoked on expiry
    trigger: Arc<dyn SleepTrigger>,
}

impl CountdownController {
    /// Create a controller wired to the given sleep trigger.
    pub fn new(trigger: Arc<dyn SleepTrigger>) -> Arc<Self> {
        let (command_tx, _) = broadcast::channel(16);
        let (state_tx, state_rx) = watch::channel(CountdownState::idle());

        Arc::new(Self {
            state: Mutex::new(CountdownState::idle()),
            command_tx,
            state_tx,
            _state_rx: state_rx,
            trigger,
        })
    }

    /// Spawn the countdown task.
    ///
    /// The command subscription is created before the task is spawned, so
    /// every command sent after this call returns is seen by the task.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let commands = self.command_tx.subscribe();
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            countdown_task(controller, commands).await;
        })
    }

    /// Arm a countdown for the given duration.
    ///
    /// Allowed from any phase; starting while a countdown is running
    /// discards the old schedule and arms a fresh one.
    pub fn start(&self, duration: SleepDuration) {
        if let Err(e) = self.command_tx.send(Command::Start(duration)) {
            warn!("Failed to send start command: {}", e);
        }
    }

    /// Stop a running countdown and reset to defaults.
    ///
    /// A no-op when nothing is running; idempotent.
    pub fn cancel(&self) {
        if let Err(e) = self.command_tx.send(Command::Cancel) {
            warn!("Failed to send cancel command: {}", e);
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state_tx.subscribe()
    }

    /// Get the latest snapshot.
    pub fn state(&self) -> Result<CountdownState, String> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock countdown state: {}", e))
    }

    /// Whether a countdown is currently running.
    pub fn is_running(&self) -> bool {
        self.state()
            .map(|state| state.phase == Phase::Running)
            .unwrap_or(false)
    }

    /// Apply an update to the snapshot and publish it to observers.
    pub(crate) fn update_state<F>(&self, updater: F) -> Result<CountdownState, String>
    where
        F: FnOnce(&mut CountdownState),
    {
        let mut state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;

        updater(&mut *state);
        let new_state = state.clone();
        drop(state);

        if let Err(e) = self.state_tx.send(new_state.clone()) {
            warn!("Failed to publish countdown state: {}", e);
        }

        Ok(new_state)
    }

    /// Replace the snapshot wholesale and publish it.
    pub(crate) fn replace_state(&self, new_state: CountdownState) -> Result<CountdownState, String> {
        self.update_state(|state| *state = new_state)
    }

    /// Ask the operating system to sleep via the configured trigger.
    pub(crate) async fn request_sleep(&self) -> Result<(), SleepError> {
        self.trigger.trigger().await
    }
}
