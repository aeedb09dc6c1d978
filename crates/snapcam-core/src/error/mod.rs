use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture and recording errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The camera device could not be opened or produced no first frame.
    #[error("Camera device open failed: {reason} {location}")]
    DeviceOpenFailed {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading a frame from an open source failed.
    #[error("Frame read failed: {reason} {location}")]
    FrameReadFailed {
        /// Description of the read failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording sink could not be opened.
    #[error("Failed to open recording at {path:?}: {reason} {location}")]
    SinkOpenFailed {
        /// Output path of the recording.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A single frame could not be written. Recording may continue.
    #[error("Frame write failed: {reason} {location}")]
    FrameWriteFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The underlying encoder stream is no longer open.
    #[error("Recording stream closed: {path:?} {location}")]
    StreamClosed {
        /// Output path of the recording.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A snapshot image could not be written.
    #[error("Snapshot failed at {path:?}: {source} {location}")]
    SnapshotFailed {
        /// Output path of the snapshot.
        path: PathBuf,
        /// Underlying image encoder error.
        #[source]
        source: image::ImageError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An output directory could not be created.
    #[error("Failed to create directory {path:?}: {source} {location}")]
    DirectoryCreationFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Display surface failed to render or release.
    #[error("Display error: {reason} {location}")]
    DisplayError {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Keyboard or other command input failed.
    #[error("Input error: {reason} {location}")]
    InputError {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Object detection failed for a frame.
    #[error("Detection failed: {reason} {location}")]
    DetectionFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CaptureError {
    /// Whether the error means the affected sink can no longer be used.
    pub fn is_fatal_for_sink(&self) -> bool {
        matches!(self, CaptureError::StreamClosed { .. })
    }
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
