use crate::{CaptureError, CoreResult, Frame, SaveSpec};

use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Writes single frames to still-image files.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    spec: SaveSpec,
}

impl SnapshotWriter {
    /// Create a writer saving through `spec`. The image format follows the
    /// spec's extension.
    pub fn new(spec: SaveSpec) -> Self {
        Self { spec }
    }

    /// Save `frame` to a fresh path and return it.
    ///
    /// The caller passes the frame exactly as displayed (after mirroring), so
    /// the file matches what the operator saw.
    #[track_caller]
    #[instrument(skip(self, frame))]
    pub fn write(&self, frame: &Frame) -> CoreResult<PathBuf> {
        let path = self.spec.next_path();

        frame.save(&path).map_err(|e| CaptureError::SnapshotFailed {
            path: path.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(path = ?path, "Snapshot saved");

        Ok(path)
    }

    /// Spec used to name snapshot files.
    pub fn spec(&self) -> &SaveSpec {
        &self.spec
    }
}
