use crate::config::{default_snapshot_dir, default_snapshot_extension, default_snapshot_stem};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where snapshots are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot directory.
    #[serde(default = "default_snapshot_dir")]
    pub dir: PathBuf,
    /// Filename prefix.
    #[serde(default = "default_snapshot_stem")]
    pub stem: String,
    /// Image extension; selects the image format.
    #[serde(default = "default_snapshot_extension")]
    pub extension: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
            stem: default_snapshot_stem(),
            extension: default_snapshot_extension(),
        }
    }
}
