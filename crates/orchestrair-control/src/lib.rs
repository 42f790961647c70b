//! OrchestrAir Control - Backend, Tracking Feed and MIDI Integration
//!
//! This crate connects the pure hand-tracking core to the outside world:
//! - **Backend**: REST client for the tracking/generation service
//! - **Feed**: Latest-frame subscription over a tracking source, with reconnect
//! - **MIDI**: Turning key transitions and drum hits into MIDI messages
//!
//! ## Feature Flags
//!
//! - `midi`: Enable MIDI output (requires `midir`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orchestrair_control::{feed, ChannelSource, ReconnectPolicy};
//!
//! # async fn run() {
//! let (tx, source) = ChannelSource::new(8);
//! let mut subscription = feed::subscribe(source, ReconnectPolicy::default());
//! while let Some(snapshot) = subscription.next().await {
//!     println!("frame {} ({:?})", snapshot.sequence, snapshot.status);
//! }
//! # drop(tx);
//! # }
//! ```

#![warn(missing_docs)]

/// Error types
pub mod error;

/// REST client for the tracking/generation backend
pub mod backend;

/// Tracking feed subscription
pub mod feed;

/// MIDI messages and note routing
pub mod midi;

// Re-exports
pub use backend::{
    BackendClient, GeneratedImage, GeneratedNotes, InstrumentStatus, StatusMessage, StoredFile,
};
pub use error::{ControlError, Result};
pub use feed::{
    ChannelSource, FeedSnapshot, FeedStatus, FeedSubscription, HttpPollSource, ReconnectPolicy,
    TrackingSource,
};
pub use midi::{MidiMessage, MidiSink, NoteRouter};

#[cfg(feature = "midi")]
pub use midi::MidiOutputHandler;
