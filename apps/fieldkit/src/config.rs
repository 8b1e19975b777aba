//! fieldkit.toml parsing
//!
//! Every section and key is optional. Command-line flags are applied on top
//! of whatever the file provides.

use anyhow::Context;
use fillable_pdf::FillOptions;
use image_qa::DEFAULT_MAX_DISTANCE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "fieldkit.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options passed to the PDF synthesizer
    pub fill: FillOptions,
    /// Image comparison settings
    pub qa: QaConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaConfig {
    /// Largest Hamming distance `compare` accepts (default: 10)
    #[serde(default = "default_max_distance")]
    pub max_distance: u32,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
        }
    }
}

fn default_max_distance() -> u32 {
    DEFAULT_MAX_DISTANCE
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// An explicit path must exist. Without one, `fieldkit.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }
}
