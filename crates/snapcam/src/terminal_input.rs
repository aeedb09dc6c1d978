use snapcam_core::{CaptureError, CommandSource, CoreResult, SessionCommand};

use std::{panic::Location, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use error_location::ErrorLocation;
use tracing::trace;

/// Map one key event to a session command.
///
/// Only presses count. Ctrl+C quits, since raw mode swallows the signal.
pub(crate) fn map_key_event(key: &KeyEvent) -> Option<SessionCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionCommand::Quit)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            SessionCommand::from_key(c)
        }
        _ => None,
    }
}

/// Reads operator keys from the terminal.
///
/// Each poll waits at most `timeout` and consumes at most one event, so a
/// burst of key presses is handled one per loop cycle.
#[derive(Debug, Clone, Copy)]
pub struct TerminalInput {
    timeout: Duration,
}

impl TerminalInput {
    /// Poll with the given per-cycle timeout.
    pub(crate) fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandSource for TerminalInput {
    #[track_caller]
    fn poll(&mut self) -> CoreResult<Option<SessionCommand>> {
        let ready = event::poll(self.timeout).map_err(|e| CaptureError::InputError {
            reason: format!("Failed to poll terminal events: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !ready {
            return Ok(None);
        }

        let event = event::read().map_err(|e| CaptureError::InputError {
            reason: format!("Failed to read terminal event: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        match event {
            Event::Key(key) => {
                let command = map_key_event(&key);
                trace!(key = ?key.code, command = ?command, "Key pressed");
                Ok(command)
            }
            _ => Ok(None),
        }
    }
}
