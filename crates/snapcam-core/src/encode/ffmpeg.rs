use crate::{
    CaptureError, CoreResult, Frame,
    encode::{EncoderFactory, EncoderParams, FourCc, VideoEncoder},
};

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// ffmpeg codec name and optional container tag for a four-character code.
pub(crate) fn codec_args(codec: FourCc) -> Option<(&'static str, Option<&'static str>)> {
    match &codec.0 {
        b"XVID" => Some(("mpeg4", Some("XVID"))),
        b"DIVX" => Some(("mpeg4", Some("DIVX"))),
        b"FMP4" => Some(("mpeg4", Some("FMP4"))),
        b"MJPG" => Some(("mjpeg", None)),
        _ => None,
    }
}

/// Remove the empty file left by the writability probe.
fn discard_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!(path = ?path, error = %e, "Empty output not removed");
    }
}

/// Spawns one `ffmpeg` process per recording.
#[derive(Debug, Clone)]
pub struct FfmpegEncoderFactory {
    ffmpeg_bin: PathBuf,
}

impl FfmpegEncoderFactory {
    /// Use the given ffmpeg executable (a bare name is resolved through `PATH`).
    pub fn new(ffmpeg_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }
}

impl Default for FfmpegEncoderFactory {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl EncoderFactory for FfmpegEncoderFactory {
    #[track_caller]
    fn open(&self, path: &Path, params: &EncoderParams) -> CoreResult<Box<dyn VideoEncoder>> {
        Ok(Box::new(FfmpegEncoder::spawn(
            &self.ffmpeg_bin,
            path,
            params,
        )?))
    }
}

/// Raw RGB frames piped into an `ffmpeg` child writing an AVI file.
pub struct FfmpegEncoder {
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    params: EncoderParams,
    frame_count: u64,
}

impl FfmpegEncoder {
    /// Spawn the encoder process.
    #[track_caller]
    #[instrument(skip(ffmpeg_bin))]
    pub fn spawn(ffmpeg_bin: &Path, path: &Path, params: &EncoderParams) -> CoreResult<Self> {
        let (codec, tag) = codec_args(params.codec).ok_or_else(|| CaptureError::SinkOpenFailed {
            path: path.to_path_buf(),
            reason: format!("Unsupported codec tag {}", params.codec),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Probe writability up front; ffmpeg only reports it after spawning.
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| CaptureError::SinkOpenFailed {
                path: path.to_path_buf(),
                reason: format!("Output not writable: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let size = format!("{}x{}", params.width, params.height);
        let fps = params.fps.to_string();

        let mut command = Command::new(ffmpeg_bin);
        command.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "rawvideo",
            "-pixel_format",
            "rgb24",
            "-video_size",
            size.as_str(),
            "-framerate",
            fps.as_str(),
            "-i",
            "-",
            "-c:v",
            codec,
        ]);
        if let Some(tag) = tag {
            command.args(["-vtag", tag, "-q:v", "5"]);
        }
        // stderr is never read while recording; a full pipe would stall the loop.
        command
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut process = match command.spawn() {
            Ok(process) => process,
            Err(e) => {
                discard_output(path);
                return Err(CaptureError::SinkOpenFailed {
                    path: path.to_path_buf(),
                    reason: format!("Failed to start ffmpeg: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let stdin = match process.stdin.take() {
            Some(stdin) => stdin,
            None => {
                let _ = process.kill();
                let _ = process.wait();
                discard_output(path);
                return Err(CaptureError::SinkOpenFailed {
                    path: path.to_path_buf(),
                    reason: "Failed to capture ffmpeg stdin".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        info!(
            path = ?path,
            width = params.width,
            height = params.height,
            fps = params.fps,
            codec = %params.codec,
            "ffmpeg encoder started"
        );

        Ok(Self {
            process: Some(process),
            stdin: Some(stdin),
            path: path.to_path_buf(),
            params: *params,
            frame_count: 0,
        })
    }

    /// Frames successfully written so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn child_exited(&mut self) -> bool {
        match self.process.as_mut() {
            Some(process) => !matches!(process.try_wait(), Ok(None)),
            None => true,
        }
    }
}

impl VideoEncoder for FfmpegEncoder {
    #[track_caller]
    fn write_frame(&mut self, frame: &Frame) -> CoreResult<()> {
        if frame.width() != self.params.width || frame.height() != self.params.height {
            return Err(CaptureError::FrameWriteFailed {
                reason: format!(
                    "Frame is {}x{}, recording expects {}x{}",
                    frame.width(),
                    frame.height(),
                    self.params.width,
                    self.params.height
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CaptureError::StreamClosed {
                path: self.path.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        match stdin.write_all(frame.as_raw()) {
            Ok(()) => {
                self.frame_count += 1;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::BrokenPipe || self.child_exited() => {
                self.stdin = None;
                Err(CaptureError::StreamClosed {
                    path: self.path.clone(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            Err(e) => Err(CaptureError::FrameWriteFailed {
                reason: format!("Failed to pipe frame to ffmpeg: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[track_caller]
    fn finish(&mut self) -> CoreResult<()> {
        // Closing stdin signals EOF so ffmpeg writes the trailer.
        drop(self.stdin.take());

        let Some(mut process) = self.process.take() else {
            return Ok(());
        };

        let status = process.wait().map_err(|e| CaptureError::FrameWriteFailed {
            reason: format!("Failed to wait for ffmpeg: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !status.success() {
            warn!(path = ?self.path, status = %status, "ffmpeg exited with failure");
        }

        debug!(path = ?self.path, frames = self.frame_count, "ffmpeg encoder finished");

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stdin.is_some()
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}
