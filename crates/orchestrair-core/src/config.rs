//! Application configuration
//!
//! Loaded once at startup from a TOML or JSON file (chosen by extension).
//! Every field has a default, so a partial file only overrides what it names.

use crate::calibration::{Calibration, CoordinateSpace};
use crate::drums::DEFAULT_STRIKE_THRESHOLD;
use crate::frame::FingertipSelection;
use crate::keys::{KeyRegistry, KeySpec};
use crate::logging::LogConfig;
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Maximum accepted config file size (1 MB)
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Instrument selected on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// Virtual piano keys
    #[default]
    Piano,
    /// Kick and snare pads
    Drums,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Piano => write!(f, "piano"),
            Self::Drums => write!(f, "drums"),
        }
    }
}

/// Connection to the tracking/generation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Interval between hand-data polls
    pub poll_interval_ms: u64,
    /// Timeout for a single request
    pub request_timeout_ms: u64,
    /// Instrument to activate on startup
    pub instrument: Instrument,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 100,
            request_timeout_ms: 2000,
            instrument: Instrument::Piano,
        }
    }
}

impl BackendConfig {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Landmark mapping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Landmarks used for hit-testing
    pub fingertips: FingertipSelection,
    /// Drum strike threshold, pixels per frame
    pub strike_threshold: f32,
    /// Affine landmark-to-key-space constants
    pub calibration: Calibration,
    /// Key coordinate space
    pub space: CoordinateSpace,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            fingertips: FingertipSelection::default(),
            strike_threshold: DEFAULT_STRIKE_THRESHOLD,
            calibration: Calibration::default(),
            space: CoordinateSpace::default(),
        }
    }
}

/// MIDI output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    /// Send notes for key transitions
    pub enabled: bool,
    /// Output port name (substring match); first port if unset
    pub port: Option<String>,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Note-on velocity (1-127)
    pub velocity: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: None,
            channel: 0,
            velocity: 100,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection
    pub backend: BackendConfig,
    /// Landmark mapping
    pub tracking: TrackingConfig,
    /// MIDI output
    pub midi: MidiConfig,
    /// Logging
    pub log: LogConfig,
    /// Key table; empty selects the built-in piano octave
    pub keys: Vec<KeySpec>,
    /// Run the chromatic-octave tutorial while playing piano
    pub tutorial: bool,
}

impl AppConfig {
    /// Load a config file, TOML or JSON by extension
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_limit(path, MAX_CONFIG_FILE_SIZE)
    }

    fn load_with_limit(path: &Path, limit: u64) -> Result<Self> {
        let size = fs::metadata(path)?.len();
        if size > limit {
            return Err(CoreError::FileTooLarge { size, limit });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let config: AppConfig = match extension {
            "toml" => toml::from_str(&fs::read_to_string(path)?)?,
            "json" => serde_json::from_str(&fs::read_to_string(path)?)?,
            _ => return Err(CoreError::UnsupportedFormat(extension.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Write the config, TOML or JSON by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "toml" => toml::to_string_pretty(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            _ => return Err(CoreError::UnsupportedFormat(extension.to_string())),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Check calibration and key table
    pub fn validate(&self) -> Result<()> {
        self.tracking.calibration.validate()?;
        self.key_registry()?;
        if !self.tracking.calibration.covers(self.tracking.space) {
            warn!(
                "Calibration {:?} maps the camera frame outside the {}x{} key space; keys will never activate",
                self.tracking.calibration, self.tracking.space.width, self.tracking.space.height
            );
        }
        Ok(())
    }

    /// Build the key registry from the configured table
    pub fn key_registry(&self) -> Result<KeyRegistry> {
        if self.keys.is_empty() {
            Ok(KeyRegistry::piano_octave())
        } else {
            KeyRegistry::new(self.keys.iter().cloned())
        }
    }
}
