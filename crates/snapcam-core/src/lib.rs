//! Snapcam Core Library
//!
//! Recording session state machine for a live webcam utility: continuous
//! recording, fixed-duration recording and snapshots, driven by single-key
//! commands from a synchronous capture loop.
//!
//! # Example
//!
//! ```no_run
//! use snapcam_core::{
//!     CaptureLoop, CoreResult, EncoderParams, FfmpegEncoderFactory, FfmpegFrameSource,
//!     FfmpegSourceOptions, FrameSource, FrameTransform, MirrorMode, NullDisplay, SaveSpec,
//!     SessionCommand, SessionController, SessionOutputs,
//! };
//!
//! struct RecordOnce(bool);
//!
//! impl snapcam_core::CommandSource for RecordOnce {
//!     fn poll(&mut self) -> CoreResult<Option<SessionCommand>> {
//!         Ok((!std::mem::replace(&mut self.0, true)).then_some(SessionCommand::SelectDuration(3)))
//!     }
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let source = FfmpegFrameSource::open(&FfmpegSourceOptions {
//!         ffmpeg_bin: "ffmpeg".into(),
//!         input_format: Some("v4l2".to_string()),
//!         device: "/dev/video0".to_string(),
//!         width: 640,
//!         height: 480,
//!     })?;
//!     let (width, height) = source.resolution();
//!
//!     let outputs = SessionOutputs {
//!         continuous: SaveSpec::new("data/Video", "Video", "avi")?,
//!         timed: SaveSpec::new("data/TimeVideo", "TimeVideo", "avi")?,
//!         snapshots: SaveSpec::new("data/SnapShot", "SnapShot", "jpg")?,
//!     };
//!     let transform = FrameTransform::new(MirrorMode::Horizontal);
//!     let controller = SessionController::new(
//!         outputs,
//!         Box::new(FfmpegEncoderFactory::default()),
//!         EncoderParams::for_resolution(width, height),
//!         transform.mirror_enabled(),
//!     );
//!
//!     let mut capture = CaptureLoop::new(
//!         Box::new(source),
//!         transform,
//!         None,
//!         Box::new(NullDisplay),
//!         Box::new(RecordOnce(false)),
//!         controller,
//!     );
//!     capture.run();
//!     Ok(())
//! }
//! ```

mod detect;
mod display;
mod encode;
mod error;
mod frame;
mod input;
mod runtime;
mod session;
mod source;

pub use {
    detect::{Detection, Detector, PassthroughDetector, process_labels},
    display::{Display, NullDisplay},
    encode::{
        EncoderFactory, EncoderParams, FfmpegEncoder, FfmpegEncoderFactory, FourCc,
        RECORDING_CODEC, RECORDING_FPS, VideoEncoder,
    },
    error::{CaptureError, Result as CoreResult},
    frame::{Frame, FrameTransform, MirrorMode},
    input::CommandSource,
    runtime::{CaptureLoop, LoopExit},
    session::{
        CommandOutcome, FILENAME_TIMESTAMP_FORMAT, RecordingSink, SaveSpec, SessionCommand,
        SessionController, SessionOutputs, SessionState, SessionStatus, SinkSlot, SnapshotWriter,
        TimedProgress,
    },
    source::{FfmpegFrameSource, FfmpegSourceOptions, FrameSource},
};

#[cfg(feature = "native-camera")]
pub use source::NativeFrameSource;
