use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent";

pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Response shape requested from the model: structured JSON for quiz
/// batches, plain text for reviewer markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Text => "text/plain",
        }
    }
}

/// Transport seam to the external text-generation service.
///
/// Implementations carry no quiz semantics: they send prompt text and
/// return response text, or `GenerationUnavailable` on any transport
/// failure, timeout, or empty reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, format: OutputFormat) -> Result<String>;
}

#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: String,
}

impl GeminiService {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl TextGenerator for GeminiService {
    async fn generate(&self, prompt: &str, format: OutputFormat) -> Result<String> {
        let payload = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "safetySettings": [
                { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_NONE" },
                { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_NONE" },
                { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE" },
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" }
            ],
            "generationConfig": { "responseMimeType": format.mime_type() }
        });

        let res = self
            .client
            .post(GENERATE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::GenerationUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::error!(%status, "Gemini API returned an error");
            return Err(Error::GenerationUnavailable(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        let body: JsonValue = res
            .json()
            .await
            .map_err(|e| Error::GenerationUnavailable(e.to_string()))?;

        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        if text.trim().is_empty() {
            return Err(Error::GenerationUnavailable(
                "No content returned from the model".to_string(),
            ));
        }

        Ok(text.to_string())
    }
}
