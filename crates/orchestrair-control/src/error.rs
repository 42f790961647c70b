//! Error types for backend, feed and MIDI plumbing
use thiserror::Error;

/// Control errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// Network or protocol failure talking to the backend
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, or the raw body
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Tracking feed ended or was shut down
    #[error("Tracking feed closed")]
    FeedClosed,

    /// Generic MIDI error
    #[error("MIDI error: {0}")]
    MidiError(String),

    /// MIDI connection error
    #[error("MIDI connection error: {0}")]
    #[cfg(feature = "midi")]
    MidiConnectionError(String),

    /// MIDI initialization error
    #[error("MIDI init error: {0}")]
    #[cfg(feature = "midi")]
    MidiInitError(#[from] midir::InitError),

    /// MIDI transmission error
    #[error("MIDI send error: {0}")]
    #[cfg(feature = "midi")]
    MidiSendError(#[from] midir::SendError),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, ControlError>;
