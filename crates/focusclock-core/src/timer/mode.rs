use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::settings::Settings;

/// Phase of the focus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    /// Human-readable label shown next to the clock.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Configured length of this phase in minutes.
    pub fn duration_min(&self, settings: &Settings) -> u32 {
        match self {
            Mode::Focus => settings.focus_minutes,
            Mode::ShortBreak => settings.short_break_minutes,
            Mode::LongBreak => settings.long_break_minutes,
        }
    }

    /// Configured length of this phase in seconds.
    ///
    /// Uses saturating arithmetic so a hand-edited config cannot overflow.
    pub fn duration_secs(&self, settings: &Settings) -> u64 {
        u64::from(self.duration_min(settings)).saturating_mul(60)
    }

    /// Phase that follows this one once it runs out.
    ///
    /// `completed_focus_cycles` must already include the phase being left.
    pub fn next(&self, completed_focus_cycles: u32, cycles_before_long_break: u32) -> Mode {
        match self {
            Mode::Focus => {
                if cycles_before_long_break > 0
                    && completed_focus_cycles % cycles_before_long_break == 0
                {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "focus" | "f" => Ok(Mode::Focus),
            "short_break" | "short" | "s" => Ok(Mode::ShortBreak),
            "long_break" | "long" | "l" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}
