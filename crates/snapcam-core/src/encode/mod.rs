//! Video encoder seam.
//!
//! [`RecordingSink`](crate::RecordingSink) talks to encoders only through
//! [`EncoderFactory`] and [`VideoEncoder`], so the state machine can be
//! exercised without spawning real encoder processes.

mod ffmpeg;

pub use ffmpeg::{FfmpegEncoder, FfmpegEncoderFactory};

#[cfg(test)]
pub(crate) use ffmpeg::codec_args;

use crate::{CoreResult, Frame};

use std::{fmt, path::Path};

/// Frame rate written into every recording.
pub const RECORDING_FPS: f64 = 30.0;

/// Codec tag used for every recording.
pub const RECORDING_CODEC: FourCc = FourCc(*b"XVID");

/// Four-character codec tag (e.g. `XVID`, `MJPG`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Tag as a string slice. Non-ASCII tags render as `????`.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({})", self.as_str())
    }
}

/// Stream parameters fixed when a recording is opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderParams {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second written to the container.
    pub fps: f64,
    /// Codec tag.
    pub codec: FourCc,
}

impl EncoderParams {
    /// Parameters for the given resolution using the process-wide fps and codec.
    pub fn for_resolution(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fps: RECORDING_FPS,
            codec: RECORDING_CODEC,
        }
    }
}

/// An open, file-backed video writer.
pub trait VideoEncoder {
    /// Append one frame.
    ///
    /// Returns `FrameWriteFailed` for a single bad frame and `StreamClosed`
    /// when the underlying stream can no longer accept data.
    fn write_frame(&mut self, frame: &Frame) -> CoreResult<()>;

    /// Flush and release the stream. Calling it again is a no-op.
    fn finish(&mut self) -> CoreResult<()>;

    /// Whether the stream still accepts frames.
    fn is_open(&self) -> bool;
}

/// Creates encoders bound to output paths.
pub trait EncoderFactory {
    /// Open a new encoder writing to `path`.
    ///
    /// # Errors
    ///
    /// Returns `SinkOpenFailed` if the path is not writable or the encoder
    /// cannot be initialised for the given parameters.
    fn open(&self, path: &Path, params: &EncoderParams) -> CoreResult<Box<dyn VideoEncoder>>;
}
