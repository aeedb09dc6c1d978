//! Configuration management for snapcam.
//!
//! Handles loading and saving the TOML configuration file with cross-platform
//! paths, per-field defaults, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CameraBackend, CameraConfig, DetectionConfig, DisplayConfig, RecordingConfig,
        SnapshotConfig,
    },
};

use std::{
    env, fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding the config file location.
pub(crate) const CONFIG_PATH_ENV: &str = "SNAPCAM_CONFIG";

/// Image extensions snapshots can be saved with.
const SNAPSHOT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Camera and capture settings.
    #[serde(default)]
    pub camera: CameraConfig,
    /// Recording output settings.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Snapshot output settings.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Terminal preview settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Object detection settings.
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl Config {
    /// Load configuration from the default location, creating it if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it is missing.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config = Self::from_toml(&contents)?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Parse configuration text. Missing sections and fields take defaults.
    #[track_caller]
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Check values that would only fail later, mid-session.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(invalid(format!(
                "Capture size must be non-zero, got {}x{}",
                self.camera.width, self.camera.height
            )));
        }

        if self.camera.backend == CameraBackend::Native && !cfg!(feature = "native-camera") {
            return Err(invalid(
                "Native camera backend requires the `native-camera` feature".to_string(),
            ));
        }

        if self.recording.extension.trim_start_matches('.').is_empty() {
            return Err(invalid("Recording extension is empty".to_string()));
        }

        let snapshot_ext = self
            .snapshot
            .extension
            .trim_start_matches('.')
            .to_ascii_lowercase();
        if !SNAPSHOT_EXTENSIONS.contains(&snapshot_ext.as_str()) {
            return Err(invalid(format!(
                "Snapshot extension {:?} not supported, expected one of {:?}",
                self.snapshot.extension, SNAPSHOT_EXTENSIONS
            )));
        }

        for stem in [
            &self.recording.continuous_stem,
            &self.recording.timed_stem,
            &self.snapshot.stem,
        ] {
            if stem.is_empty() {
                return Err(invalid("Filename stems must not be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Directory the log file is written to.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_local_dir().join("logs"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            debug!(config_path = ?path, "Config path overridden by environment");
            return Ok(path);
        }

        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "snapcam", "Snapcam").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
