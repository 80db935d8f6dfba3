mod engine;
mod mode;
pub mod settings;
pub mod snapshot;

pub use engine::{SessionController, SessionState};
pub use mode::Mode;
pub use settings::{Bounds, Rejection, SettingField, SettingValue, Settings};
pub use snapshot::{SessionSnapshot, MAX_STREAK_DOTS};
