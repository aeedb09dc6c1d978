use crate::{CaptureError, CoreResult};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeZone};
use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Timestamp format embedded in output filenames, second granularity.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y_%m_%d-%H-%M-%S";

/// Where and how a family of output files is named.
///
/// Each call to [`SaveSpec::next_path`] yields
/// `<base_dir>/<stem>_<YYYY_MM_DD-HH-MM-SS>.<extension>`. Two calls within the
/// same wall-clock second produce the same path and the later file
/// overwrites the earlier one.
#[derive(Debug, Clone)]
pub struct SaveSpec {
    base_dir: PathBuf,
    stem: String,
    extension: String,
}

impl SaveSpec {
    /// Create the spec and its base directory.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryCreationFailed` if the directory cannot be created;
    /// nothing could ever be saved through this spec in that case.
    #[track_caller]
    #[instrument(skip(base_dir, stem, extension))]
    pub fn new(
        base_dir: impl Into<PathBuf>,
        stem: impl Into<String>,
        extension: impl Into<String>,
    ) -> CoreResult<Self> {
        let base_dir = base_dir.into();
        let extension: String = extension.into();

        fs::create_dir_all(&base_dir).map_err(|e| CaptureError::DirectoryCreationFailed {
            path: base_dir.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(base_dir = ?base_dir, "Output directory ready");

        Ok(Self {
            base_dir,
            stem: stem.into(),
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    /// Fresh path stamped with the current local time.
    pub fn next_path(&self) -> PathBuf {
        self.path_at(&Local::now())
    }

    /// Path stamped with the given time.
    pub fn path_at<Tz>(&self, at: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.base_dir.join(format!(
            "{}_{}.{}",
            self.stem,
            at.format(FILENAME_TIMESTAMP_FORMAT),
            self.extension
        ))
    }

    /// Directory files are written into.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}
