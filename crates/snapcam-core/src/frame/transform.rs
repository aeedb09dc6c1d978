use crate::Frame;

use image::imageops;
use serde::{Deserialize, Serialize};

/// Mirror flip applied to every captured frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    /// Frames pass through untouched.
    None,
    /// Flip around the vertical axis (selfie view).
    #[default]
    Horizontal,
    /// Flip around the horizontal axis.
    Vertical,
    /// Flip around both axes.
    Both,
}

/// Applies the configured mirror flip to frames.
///
/// Configured once at startup and never changed while the loop runs, so the
/// live preview, recordings and snapshots all see the same orientation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTransform {
    mirror: MirrorMode,
}

impl FrameTransform {
    /// Create a transform for the given mirror mode.
    pub fn new(mirror: MirrorMode) -> Self {
        Self { mirror }
    }

    /// Whether any flip is applied.
    pub fn mirror_enabled(&self) -> bool {
        self.mirror != MirrorMode::None
    }

    /// Configured mirror mode.
    pub fn mirror(&self) -> MirrorMode {
        self.mirror
    }

    /// Apply the flip, consuming the frame.
    pub fn apply(&self, mut frame: Frame) -> Frame {
        match self.mirror {
            MirrorMode::None => {}
            MirrorMode::Horizontal => imageops::flip_horizontal_in_place(&mut frame),
            MirrorMode::Vertical => imageops::flip_vertical_in_place(&mut frame),
            MirrorMode::Both => imageops::rotate180_in_place(&mut frame),
        }
        frame
    }
}
