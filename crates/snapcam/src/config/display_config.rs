use crate::config::{default_poll_timeout_ms, default_true};

use serde::{Deserialize, Serialize};

/// Terminal preview configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Draw the live preview. When off, only the status line is drawn.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long each cycle waits for a key press, in milliseconds.
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}
