//! Async driver for the session controller.
//!
//! The service task exclusively owns a [`SessionController`]. Presentation
//! code talks to it through a cloneable [`SessionHandle`]: commands go in over
//! an mpsc channel, snapshots come out over a watch channel and events over a
//! broadcast channel. The periodic tick is only armed while the controller is
//! running, so there is never more than one tick source.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::{Mode, SessionController, SessionSnapshot, SettingField};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Discrete inputs accepted by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartPause,
    Start,
    Pause,
    Reset,
    ChangeMode(Mode),
    UpdateSetting { field: SettingField, value: String },
    StepSetting { field: SettingField, delta: i32 },
    RestoreDefaultSettings,
    SetTaskLabel(String),
    /// Tick now, measuring elapsed time from the controller's clock.
    Tick,
    /// Tick with an externally measured delta.
    Advance(Duration),
    Shutdown,
}

/// Cloneable front door to a running [`SessionService`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    events: broadcast::Sender<Event>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoreError::ServiceClosed)
    }

    pub async fn start_pause(&self) -> Result<()> {
        self.send(Command::StartPause).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.send(Command::Reset).await
    }

    pub async fn change_mode(&self, mode: Mode) -> Result<()> {
        self.send(Command::ChangeMode(mode)).await
    }

    pub async fn update_setting(&self, field: SettingField, value: impl Into<String>) -> Result<()> {
        self.send(Command::UpdateSetting {
            field,
            value: value.into(),
        })
        .await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

pub struct SessionService {
    controller: SessionController,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
    events: broadcast::Sender<Event>,
    tick_interval: Duration,
}

impl SessionService {
    /// Spawn the service on the current tokio runtime.
    ///
    /// The join handle yields the controller back once every handle is
    /// dropped or `Command::Shutdown` is received.
    pub fn spawn(
        controller: SessionController,
        tick_interval: Duration,
    ) -> (SessionHandle, JoinHandle<SessionController>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx.clone(),
        };
        let service = SessionService {
            controller,
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
        };
        (handle, tokio::spawn(service.run()))
    }

    async fn run(mut self) -> SessionController {
        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(interval_ms = self.tick_interval.as_millis() as u64, "session service started");

        loop {
            let was_running = self.controller.is_running();
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        None | Some(Command::Shutdown) => break,
                        Some(command) => {
                            let event = self.apply(command);
                            self.publish(event);
                        }
                    }
                }
                _ = ticker.tick(), if was_running => {
                    let event = self.controller.tick();
                    self.publish(event);
                }
            }
            if !was_running && self.controller.is_running() {
                // Re-arm so the first tick lands one full interval after start.
                ticker.reset();
            }
        }

        tracing::debug!("session service stopped");
        self.controller
    }

    fn apply(&mut self, command: Command) -> Option<Event> {
        let c = &mut self.controller;
        match command {
            Command::StartPause => c.start_pause(),
            Command::Start => c.start(),
            Command::Pause => c.pause(),
            Command::Reset => c.reset(),
            Command::ChangeMode(mode) => c.change_mode(mode),
            Command::UpdateSetting { field, value } => c.update_setting(field, &value),
            Command::StepSetting { field, delta } => c.step_setting(field, delta),
            Command::RestoreDefaultSettings => c.restore_default_settings(),
            Command::SetTaskLabel(label) => c.set_task_label(label),
            Command::Tick => c.tick(),
            Command::Advance(elapsed) => c.advance(elapsed),
            Command::Shutdown => None,
        }
    }

    fn publish(&self, event: Option<Event>) {
        self.snapshots.send_replace(self.controller.snapshot());
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }
}
