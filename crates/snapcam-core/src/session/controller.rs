//! Recording session state machine.
//!
//! Two independent flags (continuous, timed) select which of two sinks each
//! frame is written to. Single-key commands flip the flags; a timed recording
//! is closed by [`SessionController::advance_timed_recording`], which the
//! capture loop calls every cycle.

use crate::{
    CoreResult, Frame,
    encode::{EncoderFactory, EncoderParams},
    session::{
        CommandOutcome, RecordingSink, SaveSpec, SessionCommand, SessionState, SessionStatus,
        SinkSlot, SnapshotWriter,
    },
};

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use tracing::{debug, error, info, instrument, warn};

/// Output locations for the three kinds of file the session produces.
#[derive(Debug, Clone)]
pub struct SessionOutputs {
    /// Continuous recordings.
    pub continuous: SaveSpec,
    /// Timed recordings.
    pub timed: SaveSpec,
    /// Still snapshots.
    pub snapshots: SaveSpec,
}

/// Result of advancing the timed-recording countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedProgress {
    /// No timed recording is running.
    Inactive,
    /// Still recording with this much time left.
    Remaining(Duration),
    /// The duration elapsed and the recording was closed.
    Finished(Option<PathBuf>),
}

/// Owns the session state and both recording sinks.
pub struct SessionController {
    state: SessionState,
    continuous_sink: Option<RecordingSink>,
    timed_sink: Option<RecordingSink>,
    continuous_spec: SaveSpec,
    timed_spec: SaveSpec,
    snapshots: SnapshotWriter,
    factory: Box<dyn EncoderFactory>,
    params: EncoderParams,
}

impl SessionController {
    /// Create an idle controller.
    ///
    /// `params` fixes the resolution, fps and codec of every recording.
    pub fn new(
        outputs: SessionOutputs,
        factory: Box<dyn EncoderFactory>,
        params: EncoderParams,
        mirror_enabled: bool,
    ) -> Self {
        Self {
            state: SessionState::new(mirror_enabled),
            continuous_sink: None,
            timed_sink: None,
            continuous_spec: outputs.continuous,
            timed_spec: outputs.timed,
            snapshots: SnapshotWriter::new(outputs.snapshots),
            factory,
            params,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Display-facing summary as of `now`.
    pub fn status(&self, now: Instant) -> SessionStatus {
        SessionStatus {
            continuous_recording: self.state.continuous_recording,
            timed_recording: self.state.timed_recording,
            timed_remaining: self.state.timed_remaining(now),
            mirror_enabled: self.state.mirror_enabled,
        }
    }

    /// Output path of the running continuous recording.
    pub fn continuous_path(&self) -> Option<&std::path::Path> {
        self.continuous_sink.as_ref().map(RecordingSink::path)
    }

    /// Output path of the running timed recording.
    pub fn timed_path(&self) -> Option<&std::path::Path> {
        self.timed_sink.as_ref().map(RecordingSink::path)
    }

    /// Toggle continuous recording.
    ///
    /// # Errors
    ///
    /// Returns the sink open error when starting fails; the flag then stays
    /// inactive.
    #[instrument(skip(self))]
    pub fn start_stop_continuous(&mut self) -> CoreResult<()> {
        self.toggle_sink(SinkSlot::Continuous).map(|_| ())
    }

    /// Toggle timed recording, stamping the start time when it begins.
    ///
    /// # Errors
    ///
    /// Returns the sink open error when starting fails; the flag then stays
    /// inactive and the requested duration is cleared.
    #[instrument(skip(self, now))]
    pub fn start_stop_timed(&mut self, now: Instant) -> CoreResult<()> {
        match self.toggle_sink(SinkSlot::Timed) {
            Ok(true) => {
                self.state.timed_recording_started_at = Some(now);
                Ok(())
            }
            Ok(false) => {
                self.state.timed_recording_started_at = None;
                Ok(())
            }
            Err(e) => {
                self.state.timed_recording_started_at = None;
                self.state.timed_recording_duration_seconds = 0;
                Err(e)
            }
        }
    }

    /// Close the timed recording once its duration has passed.
    ///
    /// This is the only auto-stop path; it must run every cycle.
    pub fn advance_timed_recording(&mut self, now: Instant) -> TimedProgress {
        if !self.state.timed_recording {
            return TimedProgress::Inactive;
        }

        let started_at = *self.state.timed_recording_started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);
        let duration = Duration::from_secs(self.state.timed_recording_duration_seconds);

        if elapsed > duration {
            self.state.timed_recording_duration_seconds = 0;
            let path = self.timed_path().map(|p| p.to_path_buf());

            if let Err(e) = self.start_stop_timed(now) {
                error!(error = ?e, "Failed to stop timed recording");
            }

            info!(
                path = ?path,
                elapsed_ms = elapsed.as_millis(),
                "Timed recording finished"
            );
            TimedProgress::Finished(path)
        } else {
            let remaining = duration - elapsed;
            debug!(
                remaining_secs = remaining.as_secs_f64(),
                "Timed recording in progress"
            );
            TimedProgress::Remaining(remaining)
        }
    }

    /// Save `frame` as a still image.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotFailed` if the image cannot be encoded or written.
    pub fn snapshot(&mut self, frame: &Frame) -> CoreResult<PathBuf> {
        self.snapshots.write(frame)
    }

    /// Write `frame` to every active sink. Returns how many sinks took it.
    ///
    /// A sink whose stream has closed is released and its flag cleared; the
    /// other sink is unaffected.
    pub fn route_frame(&mut self, frame: &Frame) -> usize {
        let mut written = 0;

        if self.state.continuous_recording && self.write_to(SinkSlot::Continuous, frame) {
            written += 1;
        }
        if self.state.timed_recording && self.write_to(SinkSlot::Timed, frame) {
            written += 1;
        }

        written
    }

    /// Apply one operator command.
    ///
    /// `frame` is the current (mirrored) frame, used by snapshots. Failures
    /// are logged; the loop keeps running.
    #[instrument(skip(self, frame, now))]
    pub fn handle_command(
        &mut self,
        command: SessionCommand,
        frame: &Frame,
        now: Instant,
    ) -> CommandOutcome {
        match command {
            SessionCommand::Quit => {
                info!("Quit requested");
                return CommandOutcome::Quit;
            }
            SessionCommand::ToggleContinuous => {
                if let Err(e) = self.start_stop_continuous() {
                    error!(error = ?e, "Failed to start continuous recording");
                }
                self.state.suppress_next_frame = true;
            }
            SessionCommand::Snapshot => {
                if let Err(e) = self.snapshot(frame) {
                    error!(error = ?e, "Failed to save snapshot");
                }
                self.state.suppress_next_frame = true;
            }
            SessionCommand::SelectDuration(seconds) => {
                if self.state.timed_recording {
                    debug!(seconds, "Timed recording running, duration ignored");
                    return CommandOutcome::Continue;
                }

                self.state.timed_recording_duration_seconds = seconds;
                if seconds > 0 {
                    if let Err(e) = self.start_stop_timed(now) {
                        error!(error = ?e, seconds, "Failed to start timed recording");
                    }
                    self.state.suppress_next_frame = true;
                }
            }
        }

        CommandOutcome::Continue
    }

    /// Consume the one-shot suppress flag.
    pub fn take_suppress_next_frame(&mut self) -> bool {
        std::mem::take(&mut self.state.suppress_next_frame)
    }

    /// Release both sinks and clear all recording state. Safe to call twice.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        for slot in [SinkSlot::Continuous, SinkSlot::Timed] {
            if let Some(path) = self.release_sink(slot) {
                info!(slot = %slot, path = ?path, "Video file saved");
            }
        }

        self.state.continuous_recording = false;
        self.state.timed_recording = false;
        self.state.timed_recording_started_at = None;
        self.state.timed_recording_duration_seconds = 0;
    }

    /// Flip one slot. Returns whether it is now active.
    fn toggle_sink(&mut self, slot: SinkSlot) -> CoreResult<bool> {
        let activate = !self.flag(slot);
        info!(
            slot = %slot,
            "{}",
            if activate { "Start recording" } else { "Stop recording" }
        );

        // Release-before-open: whatever sink the slot holds is closed first,
        // in both directions, so a stale handle is never leaked.
        let finalized = self.release_sink(slot);

        if !activate {
            if let Some(path) = finalized {
                info!(slot = %slot, path = ?path, "Video file saved");
            }
            self.set_flag(slot, false);
            return Ok(false);
        }

        let spec = match slot {
            SinkSlot::Continuous => &self.continuous_spec,
            SinkSlot::Timed => &self.timed_spec,
        };
        let path = spec.next_path();

        match RecordingSink::open(slot, self.factory.as_ref(), &path, &self.params) {
            Ok(sink) => {
                *self.sink_mut(slot) = Some(sink);
                self.set_flag(slot, true);
                Ok(true)
            }
            Err(e) => {
                self.set_flag(slot, false);
                Err(e)
            }
        }
    }

    fn write_to(&mut self, slot: SinkSlot, frame: &Frame) -> bool {
        let Some(sink) = self.sink_mut(slot).as_mut() else {
            warn!(slot = %slot, "Recording flag set without an open sink");
            return false;
        };

        match sink.write(frame) {
            Ok(()) => true,
            Err(e) => {
                error!(slot = %slot, error = ?e, "Recording stream lost, stopping recording");
                self.release_sink(slot);
                self.set_flag(slot, false);
                if slot == SinkSlot::Timed {
                    self.state.timed_recording_started_at = None;
                    self.state.timed_recording_duration_seconds = 0;
                }
                false
            }
        }
    }

    /// Close and drop the slot's sink, returning the finalized path.
    fn release_sink(&mut self, slot: SinkSlot) -> Option<PathBuf> {
        let mut sink = self.sink_mut(slot).take()?;
        sink.close();
        Some(sink.path().to_path_buf())
    }

    fn sink_mut(&mut self, slot: SinkSlot) -> &mut Option<RecordingSink> {
        match slot {
            SinkSlot::Continuous => &mut self.continuous_sink,
            SinkSlot::Timed => &mut self.timed_sink,
        }
    }

    fn flag(&self, slot: SinkSlot) -> bool {
        match slot {
            SinkSlot::Continuous => self.state.continuous_recording,
            SinkSlot::Timed => self.state.timed_recording,
        }
    }

    fn set_flag(&mut self, slot: SinkSlot, value: bool) {
        match slot {
            SinkSlot::Continuous => self.state.continuous_recording = value,
            SinkSlot::Timed => self.state.timed_recording = value,
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
