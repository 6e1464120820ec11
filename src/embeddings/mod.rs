
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{Config, EMBEDDING_DIMENSION};
use crate::{KnowledgeError, Result};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// What the embedding will be used for. The API produces differently
/// optimized vectors for stored documents and for similarity queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Document,
    Query,
}

impl TaskKind {
    fn as_api_str(self) -> &'static str {
        match self {
            TaskKind::Document => "RETRIEVAL_DOCUMENT",
            TaskKind::Query => "SEMANTIC_SIMILARITY",
        }
    }
}

/// Produces fixed-dimension embedding vectors for text.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str, task: TaskKind) -> Result<Vec<f32>>;

    /// Dimensionality of every vector this embedder returns.
    fn dimension(&self) -> usize;
}

/// Blocking client for the Gemini `embedContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: Url,
    api_key: String,
    model: String,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'static str,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiClient {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(GEMINI_API_BASE)
            .map_err(|e| KnowledgeError::Embedding(format!("invalid API base URL: {e}")))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key: config.gemini_api_key.clone(),
            model: config.embed_model.clone(),
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    /// Point the client at a different API host. Used by tests to target a
    /// mock server.
    #[inline]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    fn embed_url(&self) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("/v1beta/{}:embedContent", self.model))
            .map_err(|e| KnowledgeError::Embedding(format!("failed to build embed URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn make_request_with_retry<F>(&self, mut request_fn: F) -> Result<String>
    where
        F: FnMut() -> std::result::Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!("HTTP request attempt {}/{}", attempt, self.retry_attempts);

            match request_fn() {
                Ok(response_text) => return Ok(response_text),
                Err(error) => {
                    let should_retry = match &error {
                        ureq::Error::StatusCode(status) => {
                            if *status >= 500 {
                                warn!(
                                    "Server error (status {}), attempt {}/{}",
                                    status, attempt, self.retry_attempts
                                );
                                true
                            } else {
                                warn!("Client error (status {}), not retrying", status);
                                return Err(KnowledgeError::Embedding(format!(
                                    "embedding API returned HTTP {status}"
                                )));
                            }
                        }
                        ureq::Error::ConnectionFailed
                        | ureq::Error::HostNotFound
                        | ureq::Error::Timeout(_)
                        | ureq::Error::Io(_) => {
                            warn!(
                                "Transport error: {}, attempt {}/{}",
                                error, attempt, self.retry_attempts
                            );
                            true
                        }
                        _ => false,
                    };

                    if !should_retry {
                        return Err(KnowledgeError::Embedding(format!(
                            "embedding request failed: {error}"
                        )));
                    }

                    last_error = Some(KnowledgeError::Embedding(format!(
                        "embedding request failed: {error}"
                    )));

                    if attempt < self.retry_attempts {
                        let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                        let delay = Duration::from_millis(delay_ms);
                        debug!("Waiting {:?} before retry", delay);
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        error!("All retry attempts failed for request to {}", self.base_url);

        Err(last_error.unwrap_or_else(|| {
            KnowledgeError::Embedding("embedding request failed after retries".to_string())
        }))
    }
}

impl Embedder for GeminiClient {
    fn embed(&self, text: &str, task: TaskKind) -> Result<Vec<f32>> {
        debug!(
            "Generating {:?} embedding for text (length: {})",
            task,
            text.len()
        );

        let request = EmbedRequest {
            model: &self.model,
            content: Content {
                parts: [Part { text }],
            },
            task_type: task.as_api_str(),
            output_dimensionality: EMBEDDING_DIMENSION,
        };

        let url = self.embed_url()?;
        let request_json = serde_json::to_string(&request)
            .map_err(|e| KnowledgeError::Embedding(format!("failed to serialize request: {e}")))?;

        let response_text = self.make_request_with_retry(|| {
            self.agent
                .post(url.as_str())
                .header("Content-Type", "application/json")
                .send(&request_json)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        let response: EmbedResponse = serde_json::from_str(&response_text)
            .map_err(|e| KnowledgeError::Embedding(format!("failed to parse response: {e}")))?;

        let values = response.embedding.values;
        if values.len() != EMBEDDING_DIMENSION {
            return Err(KnowledgeError::Embedding(format!(
                "expected {} dimensions, got {}",
                EMBEDDING_DIMENSION,
                values.len()
            )));
        }

        Ok(values)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
