pub mod config;
pub mod run;
pub mod simulate;

use clap::Args;
use focusclock_core::timer::settings::{
    CYCLES_BEFORE_LONG_BREAK, FOCUS_MINUTES, LONG_BREAK_MINUTES, SHORT_BREAK_MINUTES,
};
use focusclock_core::Settings;

/// Per-invocation overrides on top of the configured settings.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Focus length in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(FOCUS_MINUTES.min as i64..=FOCUS_MINUTES.max as i64))]
    pub focus: Option<u32>,
    /// Short break length in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(SHORT_BREAK_MINUTES.min as i64..=SHORT_BREAK_MINUTES.max as i64))]
    pub short_break: Option<u32>,
    /// Long break length in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(LONG_BREAK_MINUTES.min as i64..=LONG_BREAK_MINUTES.max as i64))]
    pub long_break: Option<u32>,
    /// Focus phases before a long break
    #[arg(long, value_parser = clap::value_parser!(u32).range(CYCLES_BEFORE_LONG_BREAK.min as i64..=CYCLES_BEFORE_LONG_BREAK.max as i64))]
    pub cycles: Option<u32>,
    /// Start the next phase automatically
    #[arg(long)]
    pub auto_start: bool,
    /// Do not ring at the end of a phase
    #[arg(long)]
    pub no_sound: bool,
}

impl SettingsArgs {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(n) = self.focus {
            settings.focus_minutes = n;
        }
        if let Some(n) = self.short_break {
            settings.short_break_minutes = n;
        }
        if let Some(n) = self.long_break {
            settings.long_break_minutes = n;
        }
        if let Some(n) = self.cycles {
            settings.cycles_before_long_break = n;
        }
        if self.auto_start {
            settings.auto_start_next = true;
        }
        if self.no_sound {
            settings.sound_on = false;
        }
        settings
    }
}
