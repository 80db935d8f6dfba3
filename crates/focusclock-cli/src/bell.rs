use std::io::Write;

use focusclock_core::{CompletionCue, CueError, Mode};

/// Rings the terminal bell at the end of a phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CompletionCue for TerminalBell {
    fn play(&self, _completed: Mode) -> Result<(), CueError> {
        let mut out = std::io::stdout().lock();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}
