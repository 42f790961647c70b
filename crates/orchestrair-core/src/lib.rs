//! OrchestrAir Core - Hand Tracking Geometry and Instrument Logic
//!
//! This crate contains the pure domain model for OrchestrAir, including:
//! - Hand landmark frames as delivered by the tracking service
//! - Calibration of normalized landmarks into the key coordinate space
//! - The key registry and fingertip hit-testing
//! - Per-frame processing with enter/exit transitions
//! - Overlay layout for the on-screen keyboard
//! - Note, drum and tutorial logic driven by the active keys

#![warn(missing_docs)]

pub use glam::{Vec2, Vec3};
use thiserror::Error;

// Tracking geometry
pub mod calibration;
pub mod hit_test;
pub mod keys;
pub mod landmark;

// Frame pipeline
pub mod frame;
pub mod overlay;
pub mod skeleton;
pub mod transition;

// Instruments
pub mod drums;
pub mod notes;
pub mod tutorial;

// Configuration & Logging
pub mod config;
pub mod logging;

// --- Re-exports grouped by category ---

// Geometry
pub use calibration::{Calibration, CoordinateSpace, Point2D};
pub use hit_test::{active_keys, ActiveKeySet};
pub use keys::{KeyRegion, KeyRegistry, KeySpec};
pub use landmark::{Hand, HandFrame, HandLandmark, Landmark, LANDMARKS_PER_HAND};

// Frame pipeline
pub use frame::{FingertipSelection, FrameOutput, FrameProcessor};
pub use overlay::{KeyRect, OverlayLayout};
pub use skeleton::{bone_segments, scene_position, BoneSegment, HAND_CONNECTIONS};
pub use transition::KeyTransition;

// Instruments
pub use drums::{DrumHit, DrumKit, DrumPad, StrikeDetector};
pub use notes::{midi_note_number, NoteHistory, MAX_RECENT_NOTES};
pub use tutorial::{Feedback, TutorialProgress, TutorialSession};

// Configuration & Logging
pub use config::{AppConfig, BackendConfig, Instrument, MidiConfig, TrackingConfig};
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// A key region has non-finite or inverted bounds
    #[error("Invalid key region '{note}': {reason}")]
    InvalidKeyRegion {
        /// Label of the offending key
        note: String,
        /// What is wrong with it
        reason: String,
    },

    /// Calibration constants are unusable
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Configuration file could not be read
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is not valid TOML
    #[error("Config TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("Config TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// The configuration file extension is not supported
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// The configuration file exceeds the size limit
    #[error("Config file too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Allowed size in bytes
        limit: u64,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
