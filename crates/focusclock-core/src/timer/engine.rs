//! Session controller implementation.
//!
//! The controller is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically (see [`crate::service`] for the async driver).
//!
//! ## Phase Transitions
//!
//! ```text
//! Focus -> ShortBreak -> Focus -> ... -> Focus -> LongBreak -> Focus
//!                         (every `cycles_before_long_break` focus phases)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(Settings::default());
//! controller.start();
//! // In a loop:
//! controller.tick(); // Returns Some(Event::PhaseCompleted { .. }) when a phase ends
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::settings::{SettingField, SettingValue, Settings};
use super::snapshot::{self, SessionSnapshot};
use crate::clock::{Clock, SystemClock};
use crate::cue::{CompletionCue, SilentCue};
use crate::events::Event;

/// Mutable state of the focus cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: Mode,
    /// Seconds left in the current phase. Fractional between ticks.
    pub remaining_secs: f64,
    pub is_running: bool,
    /// Focus phases completed since launch. Only meaningful modulo
    /// `cycles_before_long_break`.
    pub completed_focus_cycles: u32,
    /// Focus phases completed since launch, for display.
    pub daily_focus_sessions: u32,
}

impl SessionState {
    fn fresh(settings: &Settings) -> Self {
        Self {
            mode: Mode::Focus,
            remaining_secs: Mode::Focus.duration_secs(settings) as f64,
            is_running: false,
            completed_focus_cycles: 0,
            daily_focus_sessions: 0,
        }
    }
}

/// Owns the session state and applies every command to it.
pub struct SessionController {
    settings: Settings,
    state: SessionState,
    task_label: String,
    /// Instant the elapsed time was last flushed. `Some` only while running.
    last_tick: Option<Instant>,
    clock: Box<dyn Clock>,
    cue: Box<dyn CompletionCue>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("task_label", &self.task_label)
            .field("last_tick", &self.last_tick)
            .finish_non_exhaustive()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SessionController {
    /// Create a controller in Focus mode with the full focus duration,
    /// not running.
    pub fn new(settings: Settings) -> Self {
        let state = SessionState::fresh(&settings);
        Self {
            settings,
            state,
            task_label: String::new(),
            last_tick: None,
            clock: Box::new(SystemClock),
            cue: Box::new(SilentCue),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_cue(mut self, cue: impl CompletionCue + 'static) -> Self {
        self.cue = Box::new(cue);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn remaining_secs(&self) -> f64 {
        self.state.remaining_secs
    }

    pub fn completed_focus_cycles(&self) -> u32 {
        self.state.completed_focus_cycles
    }

    pub fn daily_focus_sessions(&self) -> u32 {
        self.state.daily_focus_sessions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn task_label(&self) -> &str {
        &self.task_label
    }

    /// Full length of the active phase in seconds.
    pub fn total_secs(&self) -> u64 {
        self.state.mode.duration_secs(&self.settings)
    }

    pub fn progress(&self) -> f64 {
        snapshot::progress(self.state.remaining_secs, self.total_secs())
    }

    /// Build a full read-only view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let remaining = self.state.remaining_secs;
        let (minutes, seconds) = snapshot::clock_parts(remaining);
        SessionSnapshot {
            mode: self.state.mode,
            mode_label: self.state.mode.label().to_string(),
            is_running: self.state.is_running,
            minutes,
            seconds,
            clock_text: snapshot::clock_text(remaining),
            remaining_secs: remaining,
            total_secs: self.total_secs(),
            progress: self.progress(),
            cycles_completed: self.state.completed_focus_cycles,
            cycle_position: snapshot::cycle_position(
                self.state.completed_focus_cycles,
                self.settings.cycles_before_long_break,
            ),
            cycles_before_long_break: self.settings.cycles_before_long_break,
            daily_focus_sessions: self.state.daily_focus_sessions,
            streak_dots: snapshot::streak_dots(self.state.daily_focus_sessions),
            settings: self.settings.clone(),
            current_task: self.task_label.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip between running and paused.
    pub fn start_pause(&mut self) -> Option<Event> {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        self.last_tick = Some(self.clock.now());
        tracing::debug!(mode = %self.state.mode, remaining = self.state.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop the countdown, keeping time already spent.
    ///
    /// If the flushed time exhausts the phase, the completion is reported
    /// instead and the next phase is left paused.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.flush_elapsed();
        if self.state.remaining_secs <= 0.0 {
            return Some(self.complete_phase(false));
        }
        self.state.is_running = false;
        self.last_tick = None;
        tracing::debug!(mode = %self.state.mode, remaining = self.state.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and rewind the current phase to its full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.stop();
        self.state.remaining_secs = self.total_secs() as f64;
        Some(Event::TimerReset {
            mode: self.state.mode,
            at: Utc::now(),
        })
    }

    /// Switch to `mode`, stopped, at its full duration.
    pub fn change_mode(&mut self, mode: Mode) -> Option<Event> {
        let from = self.state.mode;
        self.stop();
        self.state.mode = mode;
        self.state.remaining_secs = self.total_secs() as f64;
        Some(Event::ModeChanged {
            from,
            to: mode,
            at: Utc::now(),
        })
    }

    /// Apply free-form input to one setting. Invalid input is ignored, and
    /// so is input that leaves the value as it was.
    pub fn update_setting(&mut self, field: SettingField, raw: &str) -> Option<Event> {
        let before = self.settings.get(field);
        match self.settings.apply_text(field, raw) {
            Ok(value) => self.setting_changed(field, before, value),
            Err(rejection) => {
                tracing::debug!(%field, %rejection, "setting edit rejected");
                None
            }
        }
    }

    /// Nudge one setting by `delta`, clamping into range. A nudge that is
    /// absorbed by the bounds changes nothing.
    pub fn step_setting(&mut self, field: SettingField, delta: i32) -> Option<Event> {
        let before = self.settings.get(field);
        let value = self.settings.step(field, delta);
        self.setting_changed(field, before, value)
    }

    /// Put every setting back to its default. Run state is untouched.
    pub fn restore_default_settings(&mut self) -> Option<Event> {
        self.settings = Settings::default();
        self.resync_remaining(None);
        Some(Event::SettingsRestored { at: Utc::now() })
    }

    pub fn set_task_label(&mut self, label: impl Into<String>) -> Option<Event> {
        self.task_label = label.into();
        Some(Event::TaskLabelChanged {
            label: self.task_label.clone(),
            at: Utc::now(),
        })
    }

    /// Call periodically. Measures the time since the previous tick and
    /// returns `Some(Event::PhaseCompleted)` when the phase runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.flush_elapsed();
        self.complete_if_exhausted()
    }

    /// Like [`tick`](Self::tick) with an externally measured delta.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.remaining_secs = (self.state.remaining_secs - elapsed.as_secs_f64()).max(0.0);
        self.last_tick = Some(self.clock.now());
        self.complete_if_exhausted()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn stop(&mut self) {
        self.state.is_running = false;
        self.last_tick = None;
    }

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_tick {
            let now = self.clock.now();
            let elapsed = now.saturating_duration_since(last);
            self.state.remaining_secs =
                (self.state.remaining_secs - elapsed.as_secs_f64()).max(0.0);
            self.last_tick = Some(now);
            tracing::trace!(elapsed_ms = elapsed.as_millis() as u64, remaining = self.state.remaining_secs, "tick");
        }
    }

    fn complete_if_exhausted(&mut self) -> Option<Event> {
        if self.state.remaining_secs <= 0.0 {
            Some(self.complete_phase(true))
        } else {
            None
        }
    }

    fn setting_changed(
        &mut self,
        field: SettingField,
        before: SettingValue,
        value: SettingValue,
    ) -> Option<Event> {
        if value == before {
            return None;
        }
        self.resync_remaining(Some(field));
        Some(Event::SettingChanged {
            field,
            value,
            at: Utc::now(),
        })
    }

    /// Settings changed; keep `remaining_secs` consistent with the active
    /// phase. `None` means every field may have changed.
    fn resync_remaining(&mut self, field: Option<SettingField>) {
        let affects_active = match field {
            Some(SettingField::FocusMinutes) => self.state.mode == Mode::Focus,
            Some(SettingField::ShortBreakMinutes) => self.state.mode == Mode::ShortBreak,
            Some(SettingField::LongBreakMinutes) => self.state.mode == Mode::LongBreak,
            Some(_) => false,
            None => true,
        };
        if !affects_active {
            return;
        }
        let total = self.total_secs() as f64;
        if self.state.is_running {
            self.state.remaining_secs = self.state.remaining_secs.min(total);
        } else {
            self.state.remaining_secs = total;
        }
    }

    fn complete_phase(&mut self, allow_auto_start: bool) -> Event {
        let completed = self.state.mode;
        self.state.remaining_secs = 0.0;
        if completed == Mode::Focus {
            self.state.completed_focus_cycles = self.state.completed_focus_cycles.saturating_add(1);
            self.state.daily_focus_sessions = self.state.daily_focus_sessions.saturating_add(1);
        }
        let next = completed.next(
            self.state.completed_focus_cycles,
            self.settings.cycles_before_long_break,
        );

        if self.settings.sound_on {
            if let Err(e) = self.cue.play(completed) {
                tracing::debug!(error = %e, "completion cue skipped");
            }
        }

        self.state.mode = next;
        let total = next.duration_secs(&self.settings);
        self.state.remaining_secs = total as f64;
        self.state.is_running = allow_auto_start && self.settings.auto_start_next && total > 0;
        self.last_tick = self.state.is_running.then(|| self.clock.now());

        tracing::info!(
            %completed,
            %next,
            cycles = self.state.completed_focus_cycles,
            auto_started = self.state.is_running,
            "phase completed"
        );
        Event::PhaseCompleted {
            completed,
            next,
            completed_focus_cycles: self.state.completed_focus_cycles,
            daily_focus_sessions: self.state.daily_focus_sessions,
            auto_started: self.state.is_running,
            at: Utc::now(),
        }
    }
}
