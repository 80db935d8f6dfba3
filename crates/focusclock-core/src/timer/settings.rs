//! User-editable timer settings.
//!
//! Every numeric field carries its own inclusive bounds. Free-form input
//! outside those bounds is rejected outright; the stepper controls
//! (`step`) always clamp into range instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive `[min, max]` range for a numeric setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: i64) -> u32 {
        value.clamp(i64::from(self.min), i64::from(self.max)) as u32
    }
}

pub const FOCUS_MINUTES: Bounds = Bounds::new(5, 180);
pub const SHORT_BREAK_MINUTES: Bounds = Bounds::new(3, 60);
pub const LONG_BREAK_MINUTES: Bounds = Bounds::new(10, 60);
pub const CYCLES_BEFORE_LONG_BREAK: Bounds = Bounds::new(2, 8);

/// Identifies one editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingField {
    FocusMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    CyclesBeforeLongBreak,
    AutoStartNext,
    SoundOn,
}

impl SettingField {
    pub const ALL: [SettingField; 6] = [
        SettingField::FocusMinutes,
        SettingField::ShortBreakMinutes,
        SettingField::LongBreakMinutes,
        SettingField::CyclesBeforeLongBreak,
        SettingField::AutoStartNext,
        SettingField::SoundOn,
    ];

    /// Key as it appears in the config file and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::FocusMinutes => "focus_minutes",
            SettingField::ShortBreakMinutes => "short_break_minutes",
            SettingField::LongBreakMinutes => "long_break_minutes",
            SettingField::CyclesBeforeLongBreak => "cycles_before_long_break",
            SettingField::AutoStartNext => "auto_start_next",
            SettingField::SoundOn => "sound_on",
        }
    }

    /// Bounds for numeric fields; `None` for toggles.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            SettingField::FocusMinutes => Some(FOCUS_MINUTES),
            SettingField::ShortBreakMinutes => Some(SHORT_BREAK_MINUTES),
            SettingField::LongBreakMinutes => Some(LONG_BREAK_MINUTES),
            SettingField::CyclesBeforeLongBreak => Some(CYCLES_BEFORE_LONG_BREAK),
            SettingField::AutoStartNext | SettingField::SoundOn => None,
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        let key = key.strip_prefix("settings.").unwrap_or(&key);
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .or(match key {
                "focus" => Some(SettingField::FocusMinutes),
                "short" | "short_break" => Some(SettingField::ShortBreakMinutes),
                "long" | "long_break" => Some(SettingField::LongBreakMinutes),
                "cycles" => Some(SettingField::CyclesBeforeLongBreak),
                "auto" | "auto_start" => Some(SettingField::AutoStartNext),
                "sound" => Some(SettingField::SoundOn),
                _ => None,
            })
            .ok_or_else(|| format!("unknown setting: {s}"))
    }
}

/// Value carried by a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(u32),
    Flag(bool),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Why a free-form edit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotANumber(String),
    NotAFlag(String),
    OutOfRange { value: u32, bounds: Bounds },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotANumber(raw) => write!(f, "'{raw}' is not a whole number"),
            Rejection::NotAFlag(raw) => write!(f, "'{raw}' is not on/off"),
            Rejection::OutOfRange { value, bounds } => {
                write!(f, "{value} is outside {}..={}", bounds.min, bounds.max)
            }
        }
    }
}

/// Timer configuration the user can change at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_cycles_before_long_break")]
    pub cycles_before_long_break: u32,
    #[serde(default)]
    pub auto_start_next: bool,
    #[serde(default = "default_true")]
    pub sound_on: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_cycles_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            cycles_before_long_break: default_cycles_before_long_break(),
            auto_start_next: false,
            sound_on: true,
        }
    }
}

impl Settings {
    pub fn get(&self, field: SettingField) -> SettingValue {
        match field {
            SettingField::FocusMinutes => SettingValue::Number(self.focus_minutes),
            SettingField::ShortBreakMinutes => SettingValue::Number(self.short_break_minutes),
            SettingField::LongBreakMinutes => SettingValue::Number(self.long_break_minutes),
            SettingField::CyclesBeforeLongBreak => {
                SettingValue::Number(self.cycles_before_long_break)
            }
            SettingField::AutoStartNext => SettingValue::Flag(self.auto_start_next),
            SettingField::SoundOn => SettingValue::Flag(self.sound_on),
        }
    }

    /// Parse and apply free-form input.
    ///
    /// On rejection the current value is left untouched. Returns the value
    /// now in effect.
    pub fn apply_text(&mut self, field: SettingField, raw: &str) -> Result<SettingValue, Rejection> {
        let value = match field.bounds() {
            Some(bounds) => {
                let n: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| Rejection::NotANumber(raw.to_string()))?;
                if !bounds.contains(n) {
                    return Err(Rejection::OutOfRange { value: n, bounds });
                }
                SettingValue::Number(n)
            }
            None => SettingValue::Flag(parse_flag(raw).ok_or_else(|| Rejection::NotAFlag(raw.to_string()))?),
        };
        self.store(field, value);
        Ok(value)
    }

    /// Bounded increment/decrement. Numeric fields clamp into range; a
    /// non-zero delta toggles a flag.
    pub fn step(&mut self, field: SettingField, delta: i32) -> SettingValue {
        let value = match (field.bounds(), self.get(field)) {
            (Some(bounds), SettingValue::Number(current)) => {
                SettingValue::Number(bounds.clamp(i64::from(current) + i64::from(delta)))
            }
            (_, SettingValue::Flag(current)) if delta != 0 => SettingValue::Flag(!current),
            (_, current) => current,
        };
        self.store(field, value);
        value
    }

    /// First field whose value lies outside its bounds, if any.
    pub fn out_of_range(&self) -> Option<(SettingField, Rejection)> {
        SettingField::ALL.into_iter().find_map(|field| {
            match (field.bounds(), self.get(field)) {
                (Some(bounds), SettingValue::Number(value)) if !bounds.contains(value) => {
                    Some((field, Rejection::OutOfRange { value, bounds }))
                }
                _ => None,
            }
        })
    }

    fn store(&mut self, field: SettingField, value: SettingValue) {
        match (field, value) {
            (SettingField::FocusMinutes, SettingValue::Number(n)) => self.focus_minutes = n,
            (SettingField::ShortBreakMinutes, SettingValue::Number(n)) => {
                self.short_break_minutes = n
            }
            (SettingField::LongBreakMinutes, SettingValue::Number(n)) => {
                self.long_break_minutes = n
            }
            (SettingField::CyclesBeforeLongBreak, SettingValue::Number(n)) => {
                self.cycles_before_long_break = n
            }
            (SettingField::AutoStartNext, SettingValue::Flag(b)) => self.auto_start_next = b,
            (SettingField::SoundOn, SettingValue::Flag(b)) => self.sound_on = b,
            (field, value) => {
                debug_assert!(false, "{value:?} does not fit setting {field}");
            }
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_minimum_is_rejected_and_value_kept() {
        let mut settings = Settings::default();
        let err = settings
            .apply_text(SettingField::ShortBreakMinutes, "1")
            .unwrap_err();
        assert_eq!(
            err,
            Rejection::OutOfRange {
                value: 1,
                bounds: SHORT_BREAK_MINUTES
            }
        );
        assert_eq!(settings.short_break_minutes, 5);
    }

    #[test]
    fn non_numeric_is_rejected() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply_text(SettingField::FocusMinutes, "abc"),
            Err(Rejection::NotANumber(_))
        ));
        assert!(matches!(
            settings.apply_text(SettingField::FocusMinutes, "25.5"),
            Err(Rejection::NotANumber(_))
        ));
        assert!(matches!(
            settings.apply_text(SettingField::FocusMinutes, "-5"),
            Err(Rejection::NotANumber(_))
        ));
        assert_eq!(settings.focus_minutes, 25);
    }

    #[test]
    fn in_range_text_is_applied() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.apply_text(SettingField::FocusMinutes, " 50 "),
            Ok(SettingValue::Number(50))
        );
        assert_eq!(settings.focus_minutes, 50);
        assert_eq!(
            settings.apply_text(SettingField::AutoStartNext, "on"),
            Ok(SettingValue::Flag(true))
        );
        assert!(settings.auto_start_next);
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut settings = Settings::default();
        assert!(settings.apply_text(SettingField::FocusMinutes, "5").is_ok());
        assert!(settings.apply_text(SettingField::FocusMinutes, "180").is_ok());
        assert!(settings.apply_text(SettingField::FocusMinutes, "181").is_err());
        assert!(settings.apply_text(SettingField::CyclesBeforeLongBreak, "8").is_ok());
        assert!(settings.apply_text(SettingField::CyclesBeforeLongBreak, "1").is_err());
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        let mut settings = Settings::default();
        settings.long_break_minutes = 59;
        assert_eq!(
            settings.step(SettingField::LongBreakMinutes, 5),
            SettingValue::Number(60)
        );
        settings.cycles_before_long_break = 3;
        assert_eq!(
            settings.step(SettingField::CyclesBeforeLongBreak, -10),
            SettingValue::Number(2)
        );
    }

    #[test]
    fn stepping_a_flag_toggles_it() {
        let mut settings = Settings::default();
        assert_eq!(settings.step(SettingField::SoundOn, 1), SettingValue::Flag(false));
        assert_eq!(settings.step(SettingField::SoundOn, -1), SettingValue::Flag(true));
        assert_eq!(settings.step(SettingField::SoundOn, 0), SettingValue::Flag(true));
    }

    #[test]
    fn field_names_parse_from_keys_and_aliases() {
        assert_eq!("focus_minutes".parse(), Ok(SettingField::FocusMinutes));
        assert_eq!("settings.sound_on".parse(), Ok(SettingField::SoundOn));
        assert_eq!("short-break".parse(), Ok(SettingField::ShortBreakMinutes));
        assert_eq!("cycles".parse(), Ok(SettingField::CyclesBeforeLongBreak));
        assert!("volume".parse::<SettingField>().is_err());
    }

    #[test]
    #[should_panic(expected = "does not fit setting focus_minutes")]
    fn storing_a_flag_into_a_number_field_panics_in_debug() {
        let mut settings = Settings::default();
        settings.store(SettingField::FocusMinutes, SettingValue::Flag(true));
    }

    #[test]
    fn out_of_range_reports_first_bad_field() {
        let mut settings = Settings::default();
        assert!(settings.out_of_range().is_none());
        settings.long_break_minutes = 2;
        let (field, _) = settings.out_of_range().unwrap();
        assert_eq!(field, SettingField::LongBreakMinutes);
    }
}
