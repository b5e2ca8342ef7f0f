//! Analysis configuration.
//!
//! Settings are read from a TOML file (`review.toml` by default). Every field
//! is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shallowest and deepest search the analyzer will ask for.
pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 30;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for one analysis run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Path to the UCI engine. Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub engine_path: PathBuf,
    /// Search depth per position. Clamped to [`MIN_DEPTH`]..=[`MAX_DEPTH`].
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Time allowed for a single evaluation, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Time allowed for the UCI handshake, in milliseconds.
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,
    /// JSON opening book. The built-in book is used when unset.
    #[serde(default)]
    pub opening_book: Option<PathBuf>,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish")
}

fn default_depth() -> u32 {
    16
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_startup_timeout_ms() -> u64 {
    5_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            depth: default_depth(),
            timeout_ms: default_timeout_ms(),
            startup_timeout_ms: default_startup_timeout_ms(),
            opening_book: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration path, `review.toml` in the current
    /// working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("review.toml")
    }

    /// The configured depth, clamped to the supported range.
    pub fn effective_depth(&self) -> u32 {
        self.depth.clamp(MIN_DEPTH, MAX_DEPTH)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}
