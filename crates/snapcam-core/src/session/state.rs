use std::time::{Duration, Instant};

/// Live mutable state of the session controller.
///
/// The two recording flags are independent: both may be true at once, and
/// each frame goes to every sink whose flag is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Continuous recording is active.
    pub continuous_recording: bool,
    /// Timed recording is active.
    pub timed_recording: bool,
    /// Frames are mirrored. Fixed at startup.
    pub mirror_enabled: bool,
    /// When the running timed recording began.
    pub timed_recording_started_at: Option<Instant>,
    /// Requested timed duration. `0` means none requested.
    pub timed_recording_duration_seconds: u64,
    /// Drop the next frame from detection, routing and display.
    pub suppress_next_frame: bool,
}

impl SessionState {
    /// Fresh state with all flags cleared.
    pub fn new(mirror_enabled: bool) -> Self {
        Self {
            mirror_enabled,
            ..Self::default()
        }
    }

    /// Neither recording is active.
    pub fn is_idle(&self) -> bool {
        !self.continuous_recording && !self.timed_recording
    }

    /// Time left on the timed recording as of `now`.
    pub fn timed_remaining(&self, now: Instant) -> Option<Duration> {
        if !self.timed_recording {
            return None;
        }
        let started_at = self.timed_recording_started_at?;
        let total = Duration::from_secs(self.timed_recording_duration_seconds);
        Some(total.saturating_sub(now.saturating_duration_since(started_at)))
    }
}

/// Read-only view of the session handed to the display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    /// Continuous recording is active.
    pub continuous_recording: bool,
    /// Timed recording is active.
    pub timed_recording: bool,
    /// Time left on the timed recording.
    pub timed_remaining: Option<Duration>,
    /// Frames are mirrored.
    pub mirror_enabled: bool,
}
