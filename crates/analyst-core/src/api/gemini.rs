//! Google Gemini client
//!
//! Text-in/text-out generation plus the file API used for audio analysis.
//! Uploaded files report a `PROCESSING` state until Google has ingested
//! them; that wait is bounded by the [`crate::poll`] primitive.

use crate::error::{AnalystError, Result};
use crate::poll::{self, PollOutcome, PollStep};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: `https://generativelanguage.googleapis.com`)
    pub api_base: String,

    /// Model name (default: "gemini-2.5-flash")
    pub model: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from the `GEMINI_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            AnalystError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

// Wire types, camelCase on the wire

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Processing state of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A file resource on the Gemini file API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiFile {
    /// Resource name, e.g. "files/abc-123"
    pub name: String,
    pub uri: String,
    #[serde(default = "default_mime")]
    pub mime_type: String,
    pub state: FileState,
}

fn default_mime() -> String {
    "application/octet-stream".to_string()
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: GeminiFile,
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_base, self.config.model, self.config.api_key
        )
    }

    /// Generate text from a plain prompt
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    file_data: None,
                }],
            }],
        };
        self.send_generate(&request).await
    }

    /// Generate text from a prompt plus an already-uploaded file
    pub async fn generate_with_file(&self, file: &GeminiFile, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        file_data: Some(FileData {
                            mime_type: file.mime_type.clone(),
                            file_uri: file.uri.clone(),
                        }),
                    },
                    Part {
                        text: Some(prompt.to_string()),
                        file_data: None,
                    },
                ],
            }],
        };
        self.send_generate(&request).await
    }

    async fn send_generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::Ai(format!("Gemini API error {status}: {body}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::Ai(format!("Failed to parse Gemini response: {e}")))?;

        let text: String = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnalystError::Ai("Gemini returned no text".to_string()));
        }
        Ok(text)
    }

    /// Upload a local file to the file API (raw upload protocol)
    pub async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<GeminiFile> {
        let bytes = tokio::fs::read(path).await?;
        let url = format!(
            "{}/upload/v1beta/files?key={}",
            self.config.api_base, self.config.api_key
        );

        debug!(path = %path.display(), size = bytes.len(), "uploading file");

        let response = self
            .client
            .post(url)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", mime_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::Ai(format!("File upload error {status}: {body}")));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::Ai(format!("Failed to parse upload response: {e}")))?;
        Ok(body.file)
    }

    /// Fetch the current state of an uploaded file by resource name
    pub async fn get_file(&self, name: &str) -> Result<GeminiFile> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.api_base, name, self.config.api_key
        );
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AnalystError::Ai(format!("File lookup error {status}")));
        }

        response
            .json::<GeminiFile>()
            .await
            .map_err(|e| AnalystError::Ai(format!("Failed to parse file resource: {e}")))
    }

    /// Delete an uploaded file by resource name. Best-effort cleanup.
    pub async fn delete_file(&self, name: &str) -> Result<()> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.api_base, name, self.config.api_key
        );
        let response = self.client.delete(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(AnalystError::Ai(format!("File delete error {status}")));
        }
        Ok(())
    }

    /// Wait until an uploaded file leaves the `PROCESSING` state, bounded by
    /// `max_attempts` polls at a fixed `interval`.
    pub async fn wait_until_active(
        &self,
        file: GeminiFile,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<GeminiFile> {
        if file.state == FileState::Active {
            return Ok(file);
        }

        let name = file.name.clone();
        let outcome = poll::poll(max_attempts, interval, || {
            let name = name.clone();
            async move {
                match self.get_file(&name).await {
                    Ok(f) => match f.state {
                        FileState::Active => PollStep::Ready(f),
                        FileState::Processing | FileState::Unknown => PollStep::Pending,
                        FileState::Failed => {
                            PollStep::Failed("file processing failed".to_string())
                        },
                    },
                    Err(e) => PollStep::Failed(e.to_string()),
                }
            }
        })
        .await;

        match outcome {
            PollOutcome::Ready(f) => Ok(f),
            PollOutcome::TimedOut => Err(AnalystError::Timeout(format!(
                "file {name} still processing after {max_attempts} attempts"
            ))),
            PollOutcome::Failed(reason) => Err(AnalystError::Ai(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builders() {
        let config = GeminiConfig::new("key")
            .with_api_base("http://localhost:9000")
            .with_model("gemini-2.0-pro")
            .with_timeout(30);
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hello".to_string()),
                    file_data: None,
                }],
            }],
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["contents"][0]["parts"][0].get("fileData").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "추천 종목"}, {"text": " 목록"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].content.parts[0].text, "추천 종목");
    }

    #[test]
    fn test_file_state_parsing() {
        let json = r#"{
            "name": "files/abc-123",
            "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc-123",
            "mimeType": "audio/mp4",
            "state": "PROCESSING"
        }"#;
        let file: GeminiFile = serde_json::from_str(json).expect("parse");
        assert_eq!(file.state, FileState::Processing);
        assert_eq!(file.name, "files/abc-123");

        let json = json.replace("PROCESSING", "SOMETHING_NEW");
        let file: GeminiFile = serde_json::from_str(&json).expect("parse");
        assert_eq!(file.state, FileState::Unknown);
    }
}
