mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod detection_config;
mod display_config;
mod recording_config;
mod snapshot_config;

pub(crate) use {
    camera_config::{CameraBackend, CameraConfig},
    config::Config,
    detection_config::DetectionConfig,
    display_config::DisplayConfig,
    recording_config::RecordingConfig,
    snapshot_config::SnapshotConfig,
};

use std::path::PathBuf;

pub(crate) const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";
pub(crate) const DEFAULT_WIDTH: u32 = 640;
pub(crate) const DEFAULT_HEIGHT: u32 = 480;
pub(crate) const DEFAULT_CAMERA_INDEX: u32 = 0;
pub(crate) const DEFAULT_VIDEO_EXTENSION: &str = "avi";
pub(crate) const DEFAULT_SNAPSHOT_EXTENSION: &str = "jpg";
pub(crate) const DEFAULT_POLL_TIMEOUT_MS: u64 = 1;

pub(crate) fn default_ffmpeg_bin() -> PathBuf {
    PathBuf::from(DEFAULT_FFMPEG_BIN)
}

/// Capture demuxer for the current platform.
pub(crate) fn default_input_format() -> Option<String> {
    if cfg!(target_os = "linux") {
        Some("v4l2".to_string())
    } else if cfg!(target_os = "macos") {
        Some("avfoundation".to_string())
    } else if cfg!(target_os = "windows") {
        Some("dshow".to_string())
    } else {
        None
    }
}

/// First camera for the current platform's demuxer.
pub(crate) fn default_device() -> String {
    if cfg!(target_os = "macos") {
        "0".to_string()
    } else if cfg!(target_os = "windows") {
        "video=Integrated Camera".to_string()
    } else {
        "/dev/video0".to_string()
    }
}

pub(crate) fn default_camera_index() -> u32 {
    DEFAULT_CAMERA_INDEX
}

pub(crate) fn default_width() -> u32 {
    DEFAULT_WIDTH
}

pub(crate) fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

pub(crate) fn default_continuous_dir() -> PathBuf {
    PathBuf::from("data").join("Video")
}

pub(crate) fn default_continuous_stem() -> String {
    "Video".to_string()
}

pub(crate) fn default_timed_dir() -> PathBuf {
    PathBuf::from("data").join("TimeVideo")
}

pub(crate) fn default_timed_stem() -> String {
    "TimeVideo".to_string()
}

pub(crate) fn default_video_extension() -> String {
    DEFAULT_VIDEO_EXTENSION.to_string()
}

pub(crate) fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("data").join("SnapShot")
}

pub(crate) fn default_snapshot_stem() -> String {
    "SnapShot".to_string()
}

pub(crate) fn default_snapshot_extension() -> String {
    DEFAULT_SNAPSHOT_EXTENSION.to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_poll_timeout_ms() -> u64 {
    DEFAULT_POLL_TIMEOUT_MS
}
