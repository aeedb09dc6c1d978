//! The single-threaded capture loop.
//!
//! Each cycle reads one frame, mirrors it, optionally runs detection, routes
//! it to the active recordings, advances the timed countdown, shows it, and
//! polls for one operator command. Every exit path goes through
//! [`CaptureLoop::teardown`].

use crate::{
    CommandOutcome, CommandSource, Detector, Display, Frame, FrameSource, FrameTransform,
    SessionController, detect::process_labels,
};

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The operator pressed quit.
    Quit,
    /// The source ended or failed.
    EndOfStream,
}

/// Owns every collaborator of a capture session.
pub struct CaptureLoop {
    source: Box<dyn FrameSource>,
    transform: FrameTransform,
    detector: Option<Box<dyn Detector>>,
    display: Box<dyn Display>,
    commands: Box<dyn CommandSource>,
    controller: SessionController,
    cycles: u64,
    torn_down: bool,
}

impl CaptureLoop {
    /// Assemble a loop. Pass `None` as detector to skip detection entirely.
    pub fn new(
        source: Box<dyn FrameSource>,
        transform: FrameTransform,
        detector: Option<Box<dyn Detector>>,
        display: Box<dyn Display>,
        commands: Box<dyn CommandSource>,
        controller: SessionController,
    ) -> Self {
        Self {
            source,
            transform,
            detector,
            display,
            commands,
            controller,
            cycles: 0,
            torn_down: false,
        }
    }

    /// Run until quit or end of stream, then release everything.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> LoopExit {
        info!("Capture loop starting");

        let exit = loop {
            if let Some(exit) = self.cycle() {
                break exit;
            }
        };

        self.teardown();
        info!(exit = ?exit, cycles = self.cycles, "Capture loop stopped");

        exit
    }

    /// Run one cycle. Returns `Some` when the loop must stop.
    pub fn cycle(&mut self) -> Option<LoopExit> {
        let raw = match self.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("Can't receive frame (stream end?), exiting");
                return Some(LoopExit::EndOfStream);
            }
            Err(e) => {
                warn!(error = ?e, "Frame read failed, treating as end of stream");
                return Some(LoopExit::EndOfStream);
            }
        };
        self.cycles += 1;

        let frame = self.transform.apply(raw);
        let now = Instant::now();

        // The frame after a blocking record/snapshot action is stale; drop it.
        let suppressed = self.controller.take_suppress_next_frame();
        if suppressed {
            debug!(cycle = self.cycles, "Frame suppressed after recording action");
        }

        let overlay = if suppressed { None } else { self.detect(&frame) };

        if !suppressed {
            self.controller.route_frame(&frame);
        }

        self.controller.advance_timed_recording(now);

        if !suppressed {
            let status = self.controller.status(now);
            let shown = overlay.as_ref().unwrap_or(&frame);
            if let Err(e) = self.display.show(shown, &status) {
                warn!(error = ?e, "Failed to display frame");
            }
        }

        let command = match self.commands.poll() {
            Ok(command) => command,
            Err(e) => {
                warn!(error = ?e, "Failed to poll input");
                None
            }
        };

        if let Some(command) = command {
            debug!(command = ?command, "Command received");
            if self.controller.handle_command(command, &frame, Instant::now())
                == CommandOutcome::Quit
            {
                return Some(LoopExit::Quit);
            }
        }

        None
    }

    /// Release recordings, camera and display. Runs once; later calls are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.controller.shutdown();
        self.source.release();
        self.display.release();

        info!("Capture resources released");
    }

    /// Session controller, for inspection.
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Cycles that received a frame.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Overlay to display, when detection runs this cycle.
    ///
    /// Detection only runs while idle; recordings always get the clean frame.
    fn detect(&mut self, frame: &Frame) -> Option<Frame> {
        if !self.controller.state().is_idle() {
            return None;
        }
        let detector = self.detector.as_mut()?;

        match detector.detect(frame) {
            Ok(detection) => {
                process_labels(&detection.labels);
                Some(detection.overlay)
            }
            Err(e) => {
                warn!(error = ?e, "Detection failed");
                None
            }
        }
    }
}

impl Drop for CaptureLoop {
    fn drop(&mut self) {
        self.teardown();
    }
}
