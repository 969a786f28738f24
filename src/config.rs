//! Decoder configuration.
//!
//! Every tunable of the command stream search and the decoder's safety valves
//! lives here. All fields have defaults, so a JSON file only needs to name the
//! values it changes:
//!
//! ```json
//! { "max_actions": 100000, "locator": { "window": 128 } }
//! ```
//!
//! The 24 frames/second rate is fixed by the engine and is not configurable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParserError, Result};

/// Settings for the command stream search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Offsets tried in order (default: 633, 637, 629, 641, 645)
    #[serde(default = "default_candidate_offsets")]
    pub candidate_offsets: Vec<usize>,
    /// Offset used when no candidate passes (default: 633)
    #[serde(default = "default_fallback_offset")]
    pub fallback_offset: usize,
    /// Bytes inspected after each candidate (default: 200)
    #[serde(default = "default_window")]
    pub window: usize,
    /// Known opcodes required in the window (default: 5)
    #[serde(default = "default_min_opcodes")]
    pub min_opcodes: usize,
    /// Frame markers required in the window (default: 10)
    #[serde(default = "default_min_markers")]
    pub min_markers: usize,
}

/// Top-level decoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Stop after this many actions (default: 500 000)
    #[serde(default = "default_max_actions")]
    pub max_actions: usize,
    /// Stop after more than this many consecutive frames without an action
    /// (default: 1000)
    #[serde(default = "default_max_empty_frames")]
    pub max_empty_frames: u32,
    /// Command stream search settings
    #[serde(default)]
    pub locator: LocatorConfig,
    /// Fail with `CommandStreamNotFound` instead of returning an
    /// unrecoverable result (default: false)
    #[serde(default)]
    pub strict: bool,
}

fn default_candidate_offsets() -> Vec<usize> {
    vec![633, 637, 629, 641, 645]
}
fn default_fallback_offset() -> usize {
    633
}
fn default_window() -> usize {
    200
}
fn default_min_opcodes() -> usize {
    5
}
fn default_min_markers() -> usize {
    10
}
fn default_max_actions() -> usize {
    500_000
}
fn default_max_empty_frames() -> u32 {
    1000
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            candidate_offsets: default_candidate_offsets(),
            fallback_offset: default_fallback_offset(),
            window: default_window(),
            min_opcodes: default_min_opcodes(),
            min_markers: default_min_markers(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_actions: default_max_actions(),
            max_empty_frames: default_max_empty_frames(),
            locator: LocatorConfig::default(),
            strict: false,
        }
    }
}

impl DecoderConfig {
    /// Parses a (possibly partial) JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidConfig` if the JSON is malformed or a
    /// value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ParserError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::IoError` if the file cannot be read, or
    /// `ParserError::InvalidConfig` if its contents are invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every value can drive a decode.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(ParserError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.max_actions == 0 {
            return invalid("max_actions must be greater than zero");
        }
        if self.max_empty_frames == 0 {
            return invalid("max_empty_frames must be greater than zero");
        }
        if self.locator.candidate_offsets.is_empty() {
            return invalid("locator.candidate_offsets must not be empty");
        }
        if self.locator.window == 0 {
            return invalid("locator.window must be greater than zero");
        }
        Ok(())
    }
}
