//! Client for the external code-generation API.
//!
//! Speaks the OpenAI chat-completions protocol: the flowchart image travels as
//! a base64 data URL next to a system instruction naming the target language.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::RelayConfig;

/// Errors that can occur when talking to the generation API.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API credential is configured.
    #[error("generation API key is not configured")]
    MissingApiKey,
    /// Reading the staged upload failed.
    #[error("failed to read staged upload: {0}")]
    Io(#[from] std::io::Error),
    /// HTTP layer failed (connection, TLS, etc.).
    #[error("generation API request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("generation API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },
    /// The response did not have the expected structure.
    #[error("unexpected generation API response: {0}")]
    MalformedResponse(String),
}

/// A single generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// Staged flowchart image.
    pub image_path: &'a Path,
    /// MIME type of the image.
    pub mime_type: &'a str,
    /// Target programming language.
    pub language: &'a str,
}

/// Something that turns a flowchart image into source code.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Generate code for the flowchart in `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or the backend fails.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError>;
}

/// The system instruction sent with every request.
#[must_use]
pub fn system_prompt(language: &str) -> String {
    format!(
        "You are an expert software engineer. Convert the flowchart in the provided image \
         into working {language} code. Follow the flow of the diagram exactly, using its \
         labels for names and conditions. Respond with only the {language} code."
    )
}

/// Guess an image MIME type from magic bytes, falling back to the declared type.
#[must_use]
pub fn detect_mime(data: &[u8], declared: Option<&str>) -> String {
    let sniffed = if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(b"GIF8") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    };

    sniffed
        .map(str::to_string)
        .or_else(|| {
            declared
                .filter(|d| d.starts_with("image/"))
                .map(str::to_string)
        })
        .unwrap_or_else(|| "image/png".to_string())
}

/// Chat-completions response shape (only the fields we read).
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<serde_json::Value>,
}

/// [`CodeGenerator`] backed by an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGenerator {
    /// Create a generator from relay configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .user_agent(concat!("flow2code-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// The chat-completions URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, language: &str, data_url: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                json!({ "role": "system", "content": system_prompt(language) }),
                json!({
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": format!("Generate {language} code for this flowchart."),
                        },
                        { "type": "image_url", "image_url": { "url": data_url } },
                    ],
                }),
            ],
        }
    }
}

#[async_trait]
impl CodeGenerator for OpenAiGenerator {
    #[tracing::instrument(name = "generate_code", skip(self, request), fields(language = request.language))]
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let image = tokio::fs::read(request.image_path).await?;
        let data_url = format!(
            "data:{};base64,{}",
            request.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&image)
        );
        tracing::debug!(bytes = image.len(), endpoint = %self.endpoint, "forwarding flowchart");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_request(request.language, &data_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::MalformedResponse("no choices in response".into()))
    }
}
