use thiserror::Error;

pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Error taxonomy for the knowledge base.
///
/// The ingestion and search entry points never let these escape: every
/// failure is converted into a structured result at the tool boundary.
/// Only startup-time failures (configuration, collection bootstrap) abort
/// the process.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("No text extracted from the file")]
    EmptyContent,

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod chunker;
pub mod commands;
pub mod config;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod mcp;
pub mod pipeline;
pub mod profile;
pub mod search;
pub mod websearch;
