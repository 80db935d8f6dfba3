use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, SettingField, SettingValue};

/// Every state change in the session produces an Event.
/// Presentation layers render snapshots; events tell them what just happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        at: DateTime<Utc>,
    },
    /// A phase ran out while the countdown was running.
    PhaseCompleted {
        completed: Mode,
        next: Mode,
        completed_focus_cycles: u32,
        daily_focus_sessions: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingChanged {
        field: SettingField,
        value: SettingValue,
        at: DateTime<Utc>,
    },
    SettingsRestored {
        at: DateTime<Utc>,
    },
    TaskLabelChanged {
        label: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::ModeChanged { at, .. }
            | Event::PhaseCompleted { at, .. }
            | Event::SettingChanged { at, .. }
            | Event::SettingsRestored { at }
            | Event::TaskLabelChanged { at, .. } => *at,
        }
    }
}
