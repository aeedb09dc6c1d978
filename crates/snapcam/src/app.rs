use crate::{
    AppResult, TerminalDisplay, TerminalGuard, TerminalInput,
    config::{CameraBackend, CameraConfig, Config},
};

use snapcam_core::{
    CaptureLoop, Detector, EncoderParams, FfmpegEncoderFactory, FfmpegFrameSource,
    FfmpegSourceOptions, FrameSource, FrameTransform, LoopExit, PassthroughDetector, SaveSpec,
    SessionController, SessionOutputs,
};

use std::time::Duration;

use tracing::{info, instrument};

/// Build the three output specs, creating their directories.
#[track_caller]
pub(crate) fn session_outputs(config: &Config) -> AppResult<SessionOutputs> {
    Ok(SessionOutputs {
        continuous: SaveSpec::new(
            &config.recording.continuous_dir,
            config.recording.continuous_stem.as_str(),
            config.recording.extension.as_str(),
        )?,
        timed: SaveSpec::new(
            &config.recording.timed_dir,
            config.recording.timed_stem.as_str(),
            config.recording.extension.as_str(),
        )?,
        snapshots: SaveSpec::new(
            &config.snapshot.dir,
            config.snapshot.stem.as_str(),
            config.snapshot.extension.as_str(),
        )?,
    })
}

/// Open the configured camera.
#[track_caller]
#[instrument]
pub(crate) fn open_source(camera: &CameraConfig) -> AppResult<Box<dyn FrameSource>> {
    match camera.backend {
        CameraBackend::Ffmpeg => {
            let source = FfmpegFrameSource::open(&FfmpegSourceOptions {
                ffmpeg_bin: camera.ffmpeg_bin.clone(),
                input_format: camera.input_format.clone(),
                device: camera.device.clone(),
                width: camera.width,
                height: camera.height,
            })?;
            Ok(Box::new(source))
        }
        #[cfg(feature = "native-camera")]
        CameraBackend::Native => Ok(Box::new(snapcam_core::NativeFrameSource::open(
            camera.index,
        )?)),
        #[cfg(not(feature = "native-camera"))]
        CameraBackend::Native => Err(crate::AppError::ConfigError {
            reason: "Native camera backend requires the `native-camera` feature".to_string(),
            location: error_location::ErrorLocation::from(std::panic::Location::caller()),
        }),
    }
}

/// Main application: wires the configured collaborators into a capture loop.
pub struct App {
    pub(crate) config: Config,
}

impl App {
    /// Run one capture session until quit or end of stream.
    ///
    /// Camera and output directory failures are returned before the terminal
    /// is taken over.
    #[instrument(skip(self))]
    pub(crate) fn run(self) -> AppResult<LoopExit> {
        info!("Snapcam starting");

        let source = open_source(&self.config.camera)?;
        let (width, height) = source.resolution();

        let outputs = session_outputs(&self.config)?;
        let transform = FrameTransform::new(self.config.camera.mirror);
        let controller = SessionController::new(
            outputs,
            Box::new(FfmpegEncoderFactory::new(self.config.camera.ffmpeg_bin.clone())),
            EncoderParams::for_resolution(width, height),
            transform.mirror_enabled(),
        );

        let detector: Option<Box<dyn Detector>> = if self.config.detection.enabled {
            Some(Box::new(PassthroughDetector))
        } else {
            None
        };

        let guard = TerminalGuard::new()?;
        let display = TerminalDisplay::new(guard, self.config.display.enabled);
        let input = TerminalInput::new(Duration::from_millis(self.config.display.poll_timeout_ms));

        let mut capture = CaptureLoop::new(
            source,
            transform,
            detector,
            Box::new(display),
            Box::new(input),
            controller,
        );

        let exit = capture.run();

        info!(exit = ?exit, cycles = capture.cycles(), "Snapcam stopped");

        Ok(exit)
    }
}
