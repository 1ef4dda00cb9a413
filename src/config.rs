//! Host configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::runtime::DEFAULT_MAX_CALL_DEPTH;

/// Settings for [`crate::Host`]
///
/// ```toml
/// max_frames = 120
/// frame_ms = 16.0
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Frames driven after the program body finishes
    pub max_frames: u64,
    /// Virtual milliseconds per frame
    pub frame_ms: f64,
    /// Cap on top-level steps (unbounded when absent)
    pub max_steps: Option<u64>,
    /// Seed for `rand()`; entropy when absent
    pub seed: Option<u64>,
    /// Limit on nested user function calls
    pub max_call_depth: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            max_frames: 600,
            frame_ms: 16.0,
            max_steps: None,
            seed: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl HostConfig {
    /// Parses a TOML document; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    /// Reads and parses a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&source)
    }
}
