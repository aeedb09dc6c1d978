/// Operator commands, one per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Stop the loop and tear everything down.
    Quit,
    /// Start or stop continuous recording.
    ToggleContinuous,
    /// Save the current frame as a still image.
    Snapshot,
    /// Start a timed recording of the given length in seconds.
    SelectDuration(u64),
}

impl SessionCommand {
    /// Map a single key to its command. Unmapped keys yield `None`.
    ///
    /// `q` quit, `r` record, `s` snapshot, `0`/`3`/`5`/`8` timed recording of
    /// 10/3/5/8 seconds.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'q' => Some(SessionCommand::Quit),
            'r' => Some(SessionCommand::ToggleContinuous),
            's' => Some(SessionCommand::Snapshot),
            '0' => Some(SessionCommand::SelectDuration(10)),
            '3' => Some(SessionCommand::SelectDuration(3)),
            '5' => Some(SessionCommand::SelectDuration(5)),
            '8' => Some(SessionCommand::SelectDuration(8)),
            _ => None,
        }
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Keep running.
    Continue,
    /// Shut down.
    Quit,
}
