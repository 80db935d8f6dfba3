//! # focusclock Core Library
//!
//! Core logic for the focusclock focus timer. A presentation layer (the
//! `focusclock` CLI, or anything else) observes snapshots and sends commands;
//! everything stateful lives here.
//!
//! ## Architecture
//!
//! - **Session Controller**: a wall-clock-based state machine cycling through
//!   Focus, Short Break and Long Break. The caller drives it with `tick()`.
//! - **Session Service**: a tokio task that owns the controller, arms the
//!   periodic tick only while running, and publishes snapshots.
//! - **Storage**: TOML configuration supplying startup settings.
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core state machine
//! - [`SessionService`]: Async actor around the controller
//! - [`Config`]: Application configuration management
//! - [`CompletionCue`]: Seam for the end-of-phase signal

pub mod clock;
pub mod cue;
pub mod error;
pub mod events;
pub mod service;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use cue::{CompletionCue, SilentCue};
pub use error::{ConfigError, CoreError, CueError};
pub use events::Event;
pub use service::{Command, SessionHandle, SessionService};
pub use storage::Config;
pub use timer::{Mode, SessionController, SessionSnapshot, SessionState, SettingField, SettingValue, Settings};
