//! Gemini `generateContent` backend.
//!
//! Responses are classified into `AttemptOutcome` right here, so the
//! dispatcher never inspects raw HTTP bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AttemptOutcome, GenerationBackend, LlmError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.0-flash";

// Low temperature keeps JSON output consistent between runs.
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 40;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if non-blank.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// HTTP backend for the Gemini API. The credential travels as the `key` query parameter.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, MODEL)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn attempt(&self, credential: &str, prompt: &str) -> Result<AttemptOutcome, LlmError> {
        // reqwest errors carry the request URL, which includes the key.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", credential)])
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        classify_response(status, &body)
    }
}

/// Maps an HTTP status and body onto the closed set of attempt outcomes.
pub fn classify_response(status: u16, body: &str) -> Result<AttemptOutcome, LlmError> {
    match status {
        429 => Ok(AttemptOutcome::RateLimited),
        503 => Ok(AttemptOutcome::Unavailable),
        200..=299 => {
            let parsed: GenerateContentResponse = serde_json::from_str(body)?;
            parsed
                .into_text()
                .map(AttemptOutcome::Success)
                .ok_or(LlmError::EmptyContent)
        }
        _ => {
            let message = serde_json::from_str::<GeminiError>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.to_string());
            Ok(AttemptOutcome::OtherError {
                status,
                body: message,
            })
        }
    }
}
