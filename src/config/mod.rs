
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_COLLECTION_NAME: &str = "gemini-embeddings";
pub const DEFAULT_EMBED_MODEL: &str = "models/embedding-001";
pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const DEFAULT_CHUNK_OVERLAP: usize = 160;

/// Fixed dimensionality of the vector collection. Every embedding call
/// requests this output size and the collection schema is created with it.
pub const EMBEDDING_DIMENSION: usize = 768;

/// Process-wide configuration, sourced from the environment at startup.
///
/// Missing required credentials are a fatal startup error; everything else
/// falls back to a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub gemini_api_key: String,
    pub tavily_api_key: Option<String>,
    pub collection_name: String,
    pub embed_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),
    #[error("Invalid Qdrant URL: {0}")]
    InvalidQdrantUrl(String),
    #[error("Invalid value for {0}: {1} (expected a positive integer)")]
    InvalidInteger(&'static str, String),
    #[error("Invalid chunk size: {0} (must be between 100 and 8192)")]
    InvalidChunkSize(usize),
    #[error("Invalid chunk overlap: {0} (must be smaller than chunk size {1})")]
    InvalidChunkOverlap(usize, usize),
    #[error("Invalid collection name (cannot be empty)")]
    InvalidCollectionName,
    #[error("Invalid embedding model name (cannot be empty)")]
    InvalidModel,
}

impl Config {
    /// Load configuration from process environment variables.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// `from_env` delegates here; tests inject a closure instead of
    /// mutating the process environment.
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let qdrant_url = get("QDRANT_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVariable("QDRANT_URL"))?;
        let gemini_api_key = get("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVariable("GEMINI_API_KEY"))?;

        let config = Self {
            qdrant_url,
            qdrant_api_key: get("QDRANT_API_KEY").filter(|v| !v.trim().is_empty()),
            gemini_api_key,
            tavily_api_key: get("TAVILY_API_KEY").filter(|v| !v.trim().is_empty()),
            collection_name: get("COLLECTION_NAME")
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
            embed_model: get("EMBED_MODEL").unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            chunk_size: parse_usize(&get, "CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: parse_usize(&get, "CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?,
        };

        config.validate()?;
        Ok(config)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.qdrant_url)
            .map_err(|_| ConfigError::InvalidQdrantUrl(self.qdrant_url.clone()))?;

        if self.collection_name.trim().is_empty() {
            return Err(ConfigError::InvalidCollectionName);
        }

        if self.embed_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel);
        }

        if !(100..=8192).contains(&self.chunk_size) {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidChunkOverlap(
                self.chunk_overlap,
                self.chunk_size,
            ));
        }

        Ok(())
    }
}

fn parse_usize<F>(get: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidInteger(key, raw)),
        None => Ok(default),
    }
}
