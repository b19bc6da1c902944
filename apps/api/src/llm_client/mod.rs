/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// All LLM interactions MUST go through `Dispatcher`.
///
/// The dispatcher holds a pool of API keys that are rate-limited independently.
/// Each call tries the keys in a fresh random order and fails over on 429/503,
/// so a caller only sees a failure once every key has been tried.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

pub mod gemini;
pub mod prompts;

#[cfg(test)]
pub mod testing;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Failure of a single backend attempt that is not an HTTP status we can classify.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Terminal outcome of `Dispatcher::generate`.
///
/// 429/503 on a single key is never surfaced; it is logged and the next key is tried.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no usable API credentials configured")]
    Configuration,

    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("generation API error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("all {attempts} API credentials failed")]
    PoolExhausted { attempts: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Credential pool
// ────────────────────────────────────────────────────────────────────────────

/// Ordered set of API keys. Blank and duplicate entries are dropped at construction.
#[derive(Clone, Default)]
pub struct CredentialPool {
    keys: Vec<String>,
}

impl CredentialPool {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key: String = key.into();
            let key = key.trim().to_string();
            if !key.is_empty() && !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A uniformly shuffled (Fisher–Yates) view of the keys. The pool itself is untouched.
    pub fn shuffled(&self) -> Vec<&str> {
        self.shuffled_with(&mut rand::thread_rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&str> {
        let mut order: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        order.shuffle(rng);
        order
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.keys.iter().map(|k| redact(k)))
            .finish()
    }
}

/// Masks an API key for logs, keeping only the last four characters.
pub fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

// ────────────────────────────────────────────────────────────────────────────
// Backend seam
// ────────────────────────────────────────────────────────────────────────────

/// Classified result of one attempt with one credential.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(String),
    /// HTTP 429
    RateLimited,
    /// HTTP 503
    Unavailable,
    OtherError { status: u16, body: String },
}

/// A remote text-generation service. Implement this to swap providers.
///
/// `Err` means the attempt failed before a status could be classified
/// (transport error, malformed success body). Those are not retried.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn attempt(&self, credential: &str, prompt: &str) -> Result<AttemptOutcome, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ────────────────────────────────────────────────────────────────────────────

/// The single generation client used by every LLM-backed endpoint.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn GenerationBackend>,
    pool: CredentialPool,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn GenerationBackend>, pool: CredentialPool) -> Self {
        Self { backend, pool }
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Generates text for `prompt`, failing over across credentials.
    ///
    /// Attempts run one at a time with no delay; each key is used at most once.
    pub async fn generate(&self, prompt: &str) -> Result<String, DispatchError> {
        if prompt.trim().is_empty() {
            return Err(DispatchError::EmptyPrompt);
        }
        if self.pool.is_empty() {
            return Err(DispatchError::Configuration);
        }

        let order = self.pool.shuffled();

        for (attempt, key) in order.iter().enumerate() {
            match self.backend.attempt(key, prompt).await? {
                AttemptOutcome::Success(text) => {
                    debug!(
                        "Generation succeeded on attempt {} of {} ({} chars)",
                        attempt + 1,
                        order.len(),
                        text.len()
                    );
                    return Ok(text);
                }
                AttemptOutcome::RateLimited => {
                    warn!(
                        "Credential {} rate limited (429), trying next credential",
                        redact(key)
                    );
                }
                AttemptOutcome::Unavailable => {
                    warn!(
                        "Credential {} got service unavailable (503), trying next credential",
                        redact(key)
                    );
                }
                AttemptOutcome::OtherError { status, body } => {
                    return Err(DispatchError::Service { status, body });
                }
            }
        }

        Err(DispatchError::PoolExhausted {
            attempts: order.len(),
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
