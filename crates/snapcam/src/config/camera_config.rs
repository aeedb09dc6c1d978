use crate::config::{
    default_camera_index, default_device, default_ffmpeg_bin, default_height,
    default_input_format, default_width,
};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snapcam_core::MirrorMode;

/// How frames are captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackend {
    /// Read raw frames from an `ffmpeg` child process.
    #[default]
    Ffmpeg,
    /// Open the camera directly (requires the `native-camera` feature).
    Native,
}

/// Camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Capture backend.
    #[serde(default)]
    pub backend: CameraBackend,
    /// ffmpeg executable used for capture and encoding.
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: PathBuf,
    /// ffmpeg input demuxer (None = read `device` as a file or URL).
    #[serde(default = "default_input_format")]
    pub input_format: Option<String>,
    /// ffmpeg device or input path.
    #[serde(default = "default_device")]
    pub device: String,
    /// Camera index for the native backend.
    #[serde(default = "default_camera_index")]
    pub index: u32,
    /// Capture width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Capture height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Mirror flip applied to every frame.
    #[serde(default)]
    pub mirror: MirrorMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            backend: CameraBackend::default(),
            ffmpeg_bin: default_ffmpeg_bin(),
            input_format: default_input_format(),
            device: default_device(),
            index: default_camera_index(),
            width: default_width(),
            height: default_height(),
            mirror: MirrorMode::default(),
        }
    }
}
