//! Camera frame suppliers.

mod ffmpeg;
#[cfg(feature = "native-camera")]
mod native;

pub use ffmpeg::{FfmpegFrameSource, FfmpegSourceOptions};
#[cfg(feature = "native-camera")]
pub use native::NativeFrameSource;

use crate::{CoreResult, Frame};

/// Supplies raw frames one at a time.
pub trait FrameSource {
    /// Next frame, or `None` once the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns `FrameReadFailed` if the device stops delivering frames. The
    /// capture loop treats this the same as end of stream.
    fn read(&mut self) -> CoreResult<Option<Frame>>;

    /// Width and height of delivered frames.
    fn resolution(&self) -> (u32, u32);

    /// Release the device. Calling it again is a no-op.
    fn release(&mut self);
}
