use crate::error::CueError;
use crate::timer::Mode;

/// Output capability that signals the end of a phase.
///
/// Implementations may be absent or broken; the controller logs and drops
/// any error and carries on with the transition.
pub trait CompletionCue: Send + Sync {
    /// Called once per completed phase while sound is enabled.
    fn play(&self, completed: Mode) -> Result<(), CueError>;
}

/// Cue that does nothing. Used when no output device is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl CompletionCue for SilentCue {
    fn play(&self, _completed: Mode) -> Result<(), CueError> {
        Ok(())
    }
}
