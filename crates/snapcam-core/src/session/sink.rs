use crate::{
    CaptureError, CoreResult, Frame,
    encode::{EncoderFactory, EncoderParams, VideoEncoder},
};

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Which recording slot a sink belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkSlot {
    /// Operator-toggled recording.
    Continuous,
    /// Fixed-duration recording.
    Timed,
}

impl fmt::Display for SinkSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkSlot::Continuous => f.write_str("continuous"),
            SinkSlot::Timed => f.write_str("timed"),
        }
    }
}

/// An open video file receiving frames for one recording.
///
/// Owned exclusively by the session controller. Dropping the sink closes it.
pub struct RecordingSink {
    slot: SinkSlot,
    session_id: Uuid,
    path: PathBuf,
    encoder: Option<Box<dyn VideoEncoder>>,
    frames_written: u64,
    frames_failed: u64,
}

impl RecordingSink {
    /// Open a new recording at `path`.
    #[track_caller]
    #[instrument(skip(factory))]
    pub fn open(
        slot: SinkSlot,
        factory: &dyn EncoderFactory,
        path: &Path,
        params: &EncoderParams,
    ) -> CoreResult<Self> {
        let encoder = factory.open(path, params)?;
        let session_id = Uuid::new_v4();

        info!(
            slot = %slot,
            session_id = %session_id,
            path = ?path,
            "Recording sink opened"
        );

        Ok(Self {
            slot,
            session_id,
            path: path.to_path_buf(),
            encoder: Some(encoder),
            frames_written: 0,
            frames_failed: 0,
        })
    }

    /// Write one frame.
    ///
    /// A failed frame is logged and skipped. A closed stream is returned as
    /// `StreamClosed` and the sink stops accepting frames.
    #[track_caller]
    pub fn write(&mut self, frame: &Frame) -> CoreResult<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(self.closed_error());
        };

        if !encoder.is_open() {
            return Err(self.closed_error());
        }

        match encoder.write_frame(frame) {
            Ok(()) => {
                self.frames_written += 1;
                Ok(())
            }
            Err(e) if e.is_fatal_for_sink() => Err(e),
            Err(e) => {
                self.frames_failed += 1;
                warn!(
                    slot = %self.slot,
                    session_id = %self.session_id,
                    error = ?e,
                    "Dropped frame from recording"
                );
                Ok(())
            }
        }
    }

    /// Flush and release the encoder. Closing twice is a no-op.
    #[instrument(skip(self), fields(slot = %self.slot, session_id = %self.session_id))]
    pub fn close(&mut self) {
        let Some(mut encoder) = self.encoder.take() else {
            return;
        };

        if let Err(e) = encoder.finish() {
            warn!(path = ?self.path, error = ?e, "Recording did not finalize cleanly");
        }

        info!(
            path = ?self.path,
            frames_written = self.frames_written,
            frames_failed = self.frames_failed,
            "Recording sink closed"
        );
    }

    /// Whether the sink still holds an encoder.
    pub fn is_open(&self) -> bool {
        self.encoder.is_some()
    }

    /// Output path of this recording.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Slot this sink was opened for.
    pub fn slot(&self) -> SinkSlot {
        self.slot
    }

    /// Frames written successfully.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    #[track_caller]
    fn closed_error(&self) -> CaptureError {
        CaptureError::StreamClosed {
            path: self.path.clone(),
            location: error_location::ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

impl fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSink")
            .field("slot", &self.slot)
            .field("session_id", &self.session_id)
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("frames_written", &self.frames_written)
            .finish()
    }
}

impl Drop for RecordingSink {
    fn drop(&mut self) {
        self.close();
    }
}
