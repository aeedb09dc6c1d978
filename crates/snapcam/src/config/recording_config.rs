use crate::config::{
    default_continuous_dir, default_continuous_stem, default_timed_dir, default_timed_stem,
    default_video_extension,
};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Directory for continuous recordings.
    #[serde(default = "default_continuous_dir")]
    pub continuous_dir: PathBuf,
    /// Filename prefix for continuous recordings.
    #[serde(default = "default_continuous_stem")]
    pub continuous_stem: String,
    /// Directory for timed recordings.
    #[serde(default = "default_timed_dir")]
    pub timed_dir: PathBuf,
    /// Filename prefix for timed recordings.
    #[serde(default = "default_timed_stem")]
    pub timed_stem: String,
    /// Container extension for both kinds.
    #[serde(default = "default_video_extension")]
    pub extension: String,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            continuous_dir: default_continuous_dir(),
            continuous_stem: default_continuous_stem(),
            timed_dir: default_timed_dir(),
            timed_stem: default_timed_stem(),
            extension: default_video_extension(),
        }
    }
}
