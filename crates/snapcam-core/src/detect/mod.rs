//! Object-detection seam.

use crate::{CoreResult, Frame};

use tracing::trace;

/// Output of one detection pass.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Frame with detection results drawn on it, shown instead of the raw frame.
    pub overlay: Frame,
    /// Labels of detected objects.
    pub labels: Vec<String>,
}

/// Runs object detection on displayed frames.
pub trait Detector {
    /// Detect objects in `frame`.
    ///
    /// # Errors
    ///
    /// Returns `DetectionFailed`; the loop then shows the undecorated frame.
    fn detect(&mut self, frame: &Frame) -> CoreResult<Detection>;
}

/// Detector that finds nothing and leaves frames untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDetector;

impl Detector for PassthroughDetector {
    fn detect(&mut self, frame: &Frame) -> CoreResult<Detection> {
        Ok(Detection {
            overlay: frame.clone(),
            labels: Vec::new(),
        })
    }
}

/// Hook for reacting to detected labels. Currently only traced.
pub fn process_labels(labels: &[String]) {
    if !labels.is_empty() {
        trace!(labels = ?labels, "Objects detected");
    }
}
