use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use bon::Builder;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THROTTLE_MS: u64 = 16;
pub const DEFAULT_INTERRUPT_MARKER: &str = "^C\n";
/// Conventional status for a process ended by SIGINT
pub const DEFAULT_INTERRUPT_EXIT_CODE: i32 = 130;

/// Tunables for an interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct Options {
    /// Minimum milliseconds between two screen flushes (0 = every event)
    #[builder(default = DEFAULT_THROTTLE_MS)]
    pub throttle_ms: u64,
    /// Written on Ctrl+C when no interrupt hook is installed
    #[builder(into, default = DEFAULT_INTERRUPT_MARKER.to_string())]
    pub interrupt_marker: String,
    #[builder(default = DEFAULT_INTERRUPT_EXIT_CODE)]
    pub interrupt_exit_code: i32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            interrupt_marker: DEFAULT_INTERRUPT_MARKER.to_string(),
            interrupt_exit_code: DEFAULT_INTERRUPT_EXIT_CODE,
        }
    }
}

impl Options {
    #[must_use]
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Unable to parse prompt options")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid options in {}", path.display()))
    }
}
