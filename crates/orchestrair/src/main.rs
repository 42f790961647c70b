//! OrchestrAir - Play virtual instruments with your hands
//!
//! Polls the tracking backend for hand landmarks, turns fingertips over the
//! virtual keyboard into notes and forwards them to a MIDI output.
//!
//! Usage: `orchestrair [config.toml|config.json]`

#![warn(missing_docs)]

mod logging_setup;
mod session;

use anyhow::{Context, Result};
use orchestrair_control::feed;
use orchestrair_control::{BackendClient, HttpPollSource, MidiSink, ReconnectPolicy};
use orchestrair_core::{AppConfig, MidiConfig};
use session::Session;
use std::path::PathBuf;
use tracing::{error, info, warn};

fn load_config() -> Result<AppConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(AppConfig::default()),
    }
}

#[cfg(feature = "midi")]
fn open_midi(config: &MidiConfig) -> Option<Box<dyn MidiSink>> {
    use orchestrair_control::MidiOutputHandler;

    if !config.enabled {
        return None;
    }
    match MidiOutputHandler::connect(config.port.as_deref()) {
        Ok(handler) => Some(Box::new(handler)),
        Err(e) => {
            warn!("MIDI output unavailable, playing silently: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "midi"))]
fn open_midi(config: &MidiConfig) -> Option<Box<dyn MidiSink>> {
    if config.enabled {
        warn!("Built without MIDI support, ignoring [midi] settings");
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _log_guard = logging_setup::init(&config.log)?;

    info!("==========================================");
    info!("===     OrchestrAir Session Started    ===");
    info!("==========================================");

    let client = BackendClient::new(&config.backend)?;
    match client.set_instrument(config.backend.instrument).await {
        Ok(status) => info!(
            "Backend instrument: {}",
            status.instrument.as_deref().unwrap_or("unknown")
        ),
        Err(e) => warn!(
            "Could not set instrument on {}: {}",
            client.base_url(),
            e
        ),
    }

    let mut session: Session = Session::new(&config, open_midi(&config.midi))?;
    let source = HttpPollSource::new(client, config.backend.poll_interval());
    let mut subscription = feed::subscribe(source, ReconnectPolicy::default());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            snapshot = subscription.next() => match snapshot {
                Some(snapshot) => {
                    if let Err(e) = session.handle(&snapshot) {
                        error!("Failed to handle frame {}: {}", snapshot.sequence, e);
                    }
                }
                None => {
                    warn!("Tracking feed ended");
                    break;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    subscription.close();
    let held: Vec<&str> = session.active_keys().collect();
    if !held.is_empty() {
        info!("Releasing held keys: {}", held.join(" "));
    }
    session.shutdown()?;

    if let Some(tutorial) = session.tutorial() {
        info!("Tutorial step {}/{}", tutorial.step() + 1, tutorial.len());
    }
    let recent: Vec<&str> = session.history().recent().collect();
    info!("Recently played: {}", recent.join(" "));
    Ok(())
}
