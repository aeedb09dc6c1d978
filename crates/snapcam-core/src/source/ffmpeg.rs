use crate::{CaptureError, CoreResult, Frame, source::FrameSource};

use std::{
    io::{BufReader, ErrorKind, Read},
    panic::Location,
    path::PathBuf,
    process::{Child, ChildStdout, Command, Stdio},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// How to invoke ffmpeg for camera capture.
#[derive(Debug, Clone)]
pub struct FfmpegSourceOptions {
    /// ffmpeg executable.
    pub ffmpeg_bin: PathBuf,
    /// Input demuxer (`v4l2`, `avfoundation`, `dshow`). `None` reads a file or URL.
    pub input_format: Option<String>,
    /// Device or input path, e.g. `/dev/video0`.
    pub device: String,
    /// Output frame width.
    pub width: u32,
    /// Output frame height.
    pub height: u32,
}

/// Reads raw RGB frames from an `ffmpeg` child process.
///
/// The first frame is read while opening, so a missing or busy camera is
/// reported before the capture loop starts.
pub struct FfmpegFrameSource {
    process: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    width: u32,
    height: u32,
    frame_size: usize,
    pending: Option<Frame>,
    frames_read: u64,
}

impl FfmpegFrameSource {
    /// Start capture and wait for the first frame.
    ///
    /// # Errors
    ///
    /// Returns `DeviceOpenFailed` if ffmpeg cannot be started or the device
    /// yields no frame.
    #[track_caller]
    #[instrument]
    pub fn open(options: &FfmpegSourceOptions) -> CoreResult<Self> {
        if options.width == 0 || options.height == 0 {
            return Err(CaptureError::DeviceOpenFailed {
                reason: format!(
                    "Invalid capture size {}x{}",
                    options.width, options.height
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let scale = format!("scale={}:{}", options.width, options.height);

        let mut command = Command::new(&options.ffmpeg_bin);
        command.args(["-hide_banner", "-loglevel", "error"]);
        if let Some(format) = &options.input_format {
            command.args(["-f", format.as_str()]);
        }
        command
            .args([
                "-i",
                options.device.as_str(),
                "-vf",
                scale.as_str(),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut process = command.spawn().map_err(|e| CaptureError::DeviceOpenFailed {
            reason: format!("Failed to start ffmpeg: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let frame_size = options.width as usize * options.height as usize * 3;

        let stdout = process.stdout.take();
        let mut source = Self {
            process: Some(process),
            stdout: stdout.map(|s| BufReader::with_capacity(frame_size * 2, s)),
            width: options.width,
            height: options.height,
            frame_size,
            pending: None,
            frames_read: 0,
        };

        let first = source
            .read_raw()
            .map_err(|e| CaptureError::DeviceOpenFailed {
                reason: format!("Camera produced no frame: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .ok_or_else(|| CaptureError::DeviceOpenFailed {
                reason: format!("Cannot open camera {}", options.device),
                location: ErrorLocation::from(Location::caller()),
            })?;
        source.pending = Some(first);

        info!(
            device = %options.device,
            width = options.width,
            height = options.height,
            "Camera opened"
        );

        Ok(source)
    }

    /// Frames delivered so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    #[track_caller]
    fn read_raw(&mut self) -> CoreResult<Option<Frame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buffer = vec![0u8; self.frame_size];
        match stdout.read_exact(&mut buffer) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!(frames_read = self.frames_read, "Capture stream ended");
                return Ok(None);
            }
            Err(e) => {
                return Err(CaptureError::FrameReadFailed {
                    reason: format!("Failed to read frame: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Frame::from_raw(self.width, self.height, buffer)
            .map(Some)
            .ok_or_else(|| CaptureError::FrameReadFailed {
                reason: "Frame buffer size mismatch".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn read(&mut self) -> CoreResult<Option<Frame>> {
        let frame = match self.pending.take() {
            Some(frame) => Some(frame),
            None => self.read_raw()?,
        };
        if frame.is_some() {
            self.frames_read += 1;
        }
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn release(&mut self) {
        self.stdout = None;
        self.pending = None;

        let Some(mut process) = self.process.take() else {
            return;
        };

        if let Err(e) = process.kill() {
            // Already exited on its own (end of file input).
            debug!(error = ?e, "ffmpeg capture process not killed");
        }
        if let Err(e) = process.wait() {
            warn!(error = ?e, "Failed to reap ffmpeg capture process");
        }

        info!(frames_read = self.frames_read, "Camera released");
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}
