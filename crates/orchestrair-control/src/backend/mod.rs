//! Tracking/generation backend
//!
//! The backend owns the camera and the hand tracker. It serves the latest
//! landmark frame, switches the active instrument and generates album
//! covers and sheet music from the played notes.

mod client;
mod models;

pub use client::BackendClient;
pub use models::{GeneratedImage, GeneratedNotes, InstrumentStatus, StatusMessage, StoredFile};
