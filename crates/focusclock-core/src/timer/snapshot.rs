//! Read-only view of the session handed to presentation layers.
//!
//! Everything here is derived from controller state on demand; nothing is
//! stored separately.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::settings::Settings;

/// Length of the streak indicator.
pub const MAX_STREAK_DOTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub mode_label: String,
    pub is_running: bool,
    pub minutes: u64,
    pub seconds: u64,
    /// `MM:SS`
    pub clock_text: String,
    pub remaining_secs: f64,
    pub total_secs: u64,
    /// 0.0 at phase start, 1.0 when exhausted.
    pub progress: f64,
    pub cycles_completed: u32,
    /// Focus sessions into the current long-break cycle.
    pub cycle_position: u32,
    pub cycles_before_long_break: u32,
    pub daily_focus_sessions: u32,
    pub streak_dots: [bool; MAX_STREAK_DOTS],
    pub settings: Settings,
    pub current_task: String,
    pub at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// One-line status for terminal output.
    pub fn status_line(&self) -> String {
        let dots: String = self
            .streak_dots
            .iter()
            .map(|filled| if *filled { '●' } else { '○' })
            .collect();
        let state = if self.is_running { "running" } else { "paused" };
        let mut line = format!(
            "{:<11} {} [{:>3.0}%] {} cycle {}/{} {}",
            self.mode_label,
            self.clock_text,
            self.progress * 100.0,
            state,
            self.cycle_position,
            self.cycles_before_long_break,
            dots,
        );
        if !self.current_task.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.current_task);
        }
        line
    }
}

pub fn progress(remaining_secs: f64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    (1.0 - remaining_secs / total_secs as f64).clamp(0.0, 1.0)
}

/// Whole minutes and leftover whole seconds of the remaining time.
pub fn clock_parts(remaining_secs: f64) -> (u64, u64) {
    let remaining = remaining_secs.max(0.0);
    ((remaining / 60.0).floor() as u64, (remaining % 60.0).floor() as u64)
}

pub fn clock_text(remaining_secs: f64) -> String {
    let (minutes, seconds) = clock_parts(remaining_secs);
    format!("{minutes:02}:{seconds:02}")
}

pub fn streak_dots(daily_focus_sessions: u32) -> [bool; MAX_STREAK_DOTS] {
    let filled = (daily_focus_sessions as usize).min(MAX_STREAK_DOTS);
    let mut dots = [false; MAX_STREAK_DOTS];
    dots[..filled].fill(true);
    dots
}

pub fn cycle_position(completed_focus_cycles: u32, cycles_before_long_break: u32) -> u32 {
    if cycles_before_long_break == 0 {
        return 0;
    }
    completed_focus_cycles % cycles_before_long_break
}
