use crate::{AppError, AppResult};

use std::{
    io::{self, Write},
    panic::Location,
};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use error_location::ErrorLocation;
use tracing::{debug, warn};

/// RAII guard that guarantees the terminal is restored when dropped.
///
/// Enables raw mode (single key presses, no echo), switches to the alternate
/// screen and hides the cursor. On drop everything is undone with best-effort
/// semantics, so an early return or a panic in the loop never leaves the
/// shell unusable.
pub struct TerminalGuard {
    restored: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, returning the guard that undoes both.
    #[track_caller]
    pub(crate) fn new() -> AppResult<Self> {
        enable_raw_mode().map_err(|e| AppError::TerminalError {
            reason: format!("Failed to enable raw mode: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // From here on, drop restores raw mode even if the next step fails.
        let guard = Self { restored: false };

        execute!(io::stdout(), EnterAlternateScreen, Hide).map_err(|e| {
            AppError::TerminalError {
                reason: format!("Failed to enter alternate screen: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        debug!("Terminal switched to raw mode");

        Ok(guard)
    }

    /// Restore the terminal now. Later calls and the drop are no-ops.
    pub(crate) fn restore(&mut self) {
        if std::mem::replace(&mut self.restored, true) {
            return;
        }

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, Show, LeaveAlternateScreen) {
            warn!(error = %e, "Failed to leave alternate screen");
        }
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to disable raw mode");
        }
        let _ = stdout.flush();

        debug!("Terminal restored");
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
