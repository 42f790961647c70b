use serde::{Deserialize, Serialize};

/// Answer to an instrument switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentStatus {
    /// "success" or "error"
    pub status: String,
    /// Instrument now active
    #[serde(default)]
    pub instrument: Option<String>,
    /// Failure description
    #[serde(default)]
    pub message: Option<String>,
}

/// A generated album cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Human readable outcome
    pub message: String,
    /// Server-relative URL of the image
    pub image_url: String,
}

/// Result of a sheet music generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedNotes {
    /// "success" or "error"
    pub status: String,
    /// Human readable outcome
    #[serde(default)]
    pub message: Option<String>,
    /// Name of the generated file
    #[serde(default)]
    pub filename: Option<String>,
}

impl GeneratedNotes {
    /// True if the backend reported success
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// A file stored on the backend (album cover or sheet music)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    /// File name, also the key for deletion
    pub filename: String,
    /// Creation time as sent by the backend (ISO 8601)
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Generic `{status, message}` answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// "success" or "error"
    pub status: String,
    /// Human readable outcome
    #[serde(default)]
    pub message: String,
}

impl StatusMessage {
    /// True if the backend reported success
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    Error { error: String },
    Message { message: String },
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> String {
        match self {
            ErrorBody::Error { error } => error,
            ErrorBody::Message { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_stored_files() {
        let json = json!([
            {"filename": "cover_1.png", "createdAt": "2024-11-02T10:15:00"},
            {"filename": "cover_2.png", "createdAt": "2024-11-02T10:16:30"}
        ]);
        let files: Vec<StoredFile> = serde_json::from_value(json).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].filename, "cover_2.png");
        assert_eq!(files[0].created_at, "2024-11-02T10:15:00");
    }

    #[test]
    fn test_parse_instrument_error() {
        let json = json!({"status": "error", "message": "Instrument not found!"});
        let status: InstrumentStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.instrument, None);
        assert_eq!(status.message.as_deref(), Some("Instrument not found!"));
    }

    #[test]
    fn test_parse_error_body() {
        let body: ErrorBody =
            serde_json::from_value(json!({"error": "No notes played yet."})).unwrap();
        assert_eq!(body.into_message(), "No notes played yet.");

        let body: ErrorBody =
            serde_json::from_value(json!({"status": "error", "message": "missing"})).unwrap();
        assert_eq!(body.into_message(), "missing");
    }
}
