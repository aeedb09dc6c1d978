use serde::{Deserialize, Serialize};

/// Object detection configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Run the detector on idle frames. Off unless a real model is wired in.
    #[serde(default)]
    pub enabled: bool,
}
