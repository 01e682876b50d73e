//! Pipeline configuration and the optional TOML defaults file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SplitError;

/// Parameters of the segmentation pipeline. All fields have defaults and can
/// be overridden independently.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    /// Minimum quiet-run length in seconds to count as a split candidate.
    pub min_silence_duration: f64,
    /// Final segments shorter than this (seconds) are merged into their
    /// predecessor.
    pub min_song_duration: f64,
    /// Analysis window size in samples. Larger windows trade time resolution
    /// for frequency resolution.
    pub frame_length: usize,
    /// Step between consecutive frames in samples (50% overlap by default).
    pub hop_length: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            min_silence_duration: 5.0,
            min_song_duration: 30.0,
            frame_length: 4096,
            hop_length: 2048,
        }
    }
}

impl SplitConfig {
    /// Fail fast on malformed parameters rather than producing degenerate
    /// output downstream.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.frame_length == 0 {
            return Err(SplitError::InvalidConfig(
                "frame_length must be positive".to_string(),
            ));
        }
        if self.hop_length == 0 {
            return Err(SplitError::InvalidConfig(
                "hop_length must be positive".to_string(),
            ));
        }
        if !self.min_silence_duration.is_finite() || self.min_silence_duration < 0.0 {
            return Err(SplitError::InvalidConfig(
                "min_silence_duration must be a non-negative number".to_string(),
            ));
        }
        if !self.min_song_duration.is_finite() || self.min_song_duration < 0.0 {
            return Err(SplitError::InvalidConfig(
                "min_song_duration must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Splitter defaults that can be saved to a file and merged with
/// command-line overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_silence_duration: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_song_duration: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

impl Defaults {
    /// Get the defaults file path (~/.config/songsplit/defaults.toml)
    pub fn config_path() -> Result<PathBuf, io::Error> {
        let home = std::env::var("HOME").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set")
        })?;

        let config_dir = Path::new(&home).join(".config").join("songsplit");
        Ok(config_dir.join("defaults.toml"))
    }

    /// Load defaults from file. Returns an empty config if the file does not
    /// exist.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Defaults::default());
        }

        let content = fs::read_to_string(&path)?;
        let defaults: Defaults = toml::from_str(&content)?;
        Ok(defaults)
    }

    /// Save defaults to file, creating the parent directory if needed.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&path, toml_string)?;

        Ok(())
    }

    /// Merge this config with another, preferring values from other.
    pub fn merge(&mut self, other: &Defaults) {
        if other.min_silence_duration.is_some() {
            self.min_silence_duration = other.min_silence_duration;
        }
        if other.min_song_duration.is_some() {
            self.min_song_duration = other.min_song_duration;
        }
        if other.frame_length.is_some() {
            self.frame_length = other.frame_length;
        }
        if other.hop_length.is_some() {
            self.hop_length = other.hop_length;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir.clone();
        }
    }

    /// Build a [`SplitConfig`] by overlaying these defaults onto the
    /// built-in values.
    pub fn to_split_config(&self) -> SplitConfig {
        let mut config = SplitConfig::default();
        if let Some(v) = self.min_silence_duration {
            config.min_silence_duration = v;
        }
        if let Some(v) = self.min_song_duration {
            config.min_song_duration = v;
        }
        if let Some(v) = self.frame_length {
            config.frame_length = v;
        }
        if let Some(v) = self.hop_length {
            config.hop_length = v;
        }
        config
    }
}
