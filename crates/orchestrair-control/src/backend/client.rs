use super::models::{
    ErrorBody, GeneratedImage, GeneratedNotes, InstrumentStatus, StatusMessage, StoredFile,
};
use crate::error::{ControlError, Result};
use orchestrair_core::{BackendConfig, HandFrame, Instrument};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct InstrumentBody {
    instrument: Instrument,
}

#[derive(Serialize)]
struct NotesBody<'a> {
    instructions: &'a str,
}

/// REST client for the backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Build a client for the configured backend
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ControlError::InvalidParameter(format!("base_url '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ControlError::InvalidParameter(format!(
                "base_url '{}' cannot hold a path",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if config.request_timeout_ms > 0 {
            builder = builder.timeout(config.request_timeout());
        }
        let http = builder.build()?;

        Ok(Self { http, base_url })
    }

    /// Backend root URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a server-relative path (such as an `image_url`) to an absolute URL.
    /// Absolute URLs are returned unchanged.
    pub fn asset_url(&self, path: &str) -> String {
        if let Ok(url) = Url::parse(path) {
            if !url.cannot_be_a_base() {
                return url.into();
            }
        }
        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        self.endpoint(&segments).into()
    }

    /// URL of a stored album cover
    pub fn album_cover_url(&self, filename: &str) -> String {
        self.endpoint(&["Images", filename]).into()
    }

    /// URL of a stored sheet music PDF
    pub fn sheet_music_url(&self, filename: &str) -> String {
        self.endpoint(&["notes", filename]).into()
    }

    /// Activate an instrument on the backend
    pub async fn set_instrument(&self, instrument: Instrument) -> Result<InstrumentStatus> {
        debug!("Setting backend instrument to {}", instrument);
        let resp = self
            .http
            .post(self.endpoint(&["set-instrument"]))
            .json(&InstrumentBody { instrument })
            .send()
            .await?;
        read_json(resp).await
    }

    /// Latest hand landmark frame
    pub async fn hand_data(&self) -> Result<HandFrame> {
        let resp = self.http.get(self.hand_data_url()).send().await?;
        read_json(resp).await
    }

    /// URL of the latest-landmarks endpoint
    pub fn hand_data_url(&self) -> Url {
        self.endpoint(&["hand-data"])
    }

    /// Generate an album cover from the recently played notes
    pub async fn generate_album_cover(&self) -> Result<GeneratedImage> {
        let resp = self
            .http
            .post(self.endpoint(&["generate-image"]))
            .send()
            .await?;
        read_json(resp).await
    }

    /// List stored album covers
    pub async fn list_album_covers(&self) -> Result<Vec<StoredFile>> {
        let resp = self.http.get(self.endpoint(&["album-covers"])).send().await?;
        read_json(resp).await
    }

    /// Delete a stored album cover
    pub async fn delete_album_cover(&self, filename: &str) -> Result<StatusMessage> {
        let resp = self
            .http
            .delete(self.endpoint(&["album-covers", filename]))
            .send()
            .await?;
        read_json(resp).await
    }

    /// Generate sheet music from free-text instructions
    pub async fn generate_notes(&self, instructions: &str) -> Result<GeneratedNotes> {
        let resp = self
            .http
            .post(self.endpoint(&["generate-notes"]))
            .json(&NotesBody { instructions })
            .send()
            .await?;
        read_json(resp).await
    }

    /// List stored sheet music
    pub async fn list_sheet_music(&self) -> Result<Vec<StoredFile>> {
        let resp = self.http.get(self.endpoint(&["sheet-music"])).send().await?;
        read_json(resp).await
    }

    /// Delete stored sheet music
    pub async fn delete_sheet_music(&self, filename: &str) -> Result<StatusMessage> {
        let resp = self
            .http
            .delete(self.endpoint(&["sheet-music", filename]))
            .send()
            .await?;
        read_json(resp).await
    }

    /// Base URL with percent-encoded path segments appended
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in new(): the base can always hold a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(backend_error(status.as_u16(), &body))
}

fn backend_error(status: u16, body: &str) -> ControlError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(ErrorBody::into_message)
        .unwrap_or_else(|_| body.trim().to_string());
    ControlError::Backend { status, message }
}
