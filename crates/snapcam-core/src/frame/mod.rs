mod transform;

pub use transform::{FrameTransform, MirrorMode};

/// A captured video frame: 8-bit RGB, row-major.
pub type Frame = image::RgbImage;
