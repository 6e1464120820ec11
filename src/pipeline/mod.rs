//! The ingestion pipeline: extract, chunk, embed, store.


use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chunker::TextSplitter;
use crate::embeddings::{Embedder, TaskKind};
use crate::extract;
use crate::index::{ChunkPoint, VectorIndex};
use crate::{KnowledgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Success,
    Error,
}

/// Structured outcome of an ingestion attempt. Failures are reported here
/// rather than as errors so callers always get a message they can relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub status: IngestStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
}

impl IngestReport {
    fn success(chunk_count: usize) -> Self {
        Self {
            status: IngestStatus::Success,
            message: format!("Document added with {chunk_count} chunks"),
            chunk_count: Some(chunk_count),
        }
    }

    fn error(err: &KnowledgeError) -> Self {
        let message = match err {
            KnowledgeError::NotFound(_) | KnowledgeError::EmptyContent => err.to_string(),
            other => format!("Error adding document: {other}"),
        };
        Self {
            status: IngestStatus::Error,
            message,
            chunk_count: None,
        }
    }
}

/// Drives a file through extraction, chunking, embedding, and storage.
///
/// With `overwrite`, previously stored points for the same path are deleted
/// before the new ones are written; a concurrent search during that window
/// will not see the document. Ingesting the same path from two tasks at
/// once is the caller's responsibility to avoid.
pub struct IngestionPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    splitter: TextSplitter,
}

impl IngestionPipeline {
    #[inline]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        splitter: TextSplitter,
    ) -> Self {
        Self {
            embedder,
            index,
            splitter,
        }
    }

    /// Ingest one file. Never fails: every outcome is an `IngestReport`.
    pub async fn ingest(&self, file_path: &str, overwrite: bool) -> IngestReport {
        match self.ingest_inner(file_path, overwrite).await {
            Ok(chunk_count) => {
                info!("Ingested {} as {} chunks", file_path, chunk_count);
                IngestReport::success(chunk_count)
            }
            Err(e) => {
                warn!("Ingestion of {} failed: {}", file_path, e);
                IngestReport::error(&e)
            }
        }
    }

    async fn ingest_inner(&self, file_path: &str, overwrite: bool) -> Result<usize> {
        let path = Path::new(file_path).to_path_buf();
        let text = tokio::task::spawn_blocking(move || extract::extract_text(&path))
            .await
            .map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;

        if text.trim().is_empty() {
            return Err(KnowledgeError::EmptyContent);
        }

        let chunks = self.splitter.split(&text);
        if chunks.is_empty() {
            return Err(KnowledgeError::EmptyContent);
        }

        if overwrite {
            self.index.delete_by_file_path(file_path).await?;
        }

        // Embedding goes through a blocking HTTP client, one chunk at a
        // time, off the async runtime.
        let embedder = Arc::clone(&self.embedder);
        let owner = file_path.to_string();
        let points = tokio::task::spawn_blocking(move || -> Result<Vec<ChunkPoint>> {
            let mut points = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                let vector = embedder.embed(&chunk, TaskKind::Document)?;
                points.push(ChunkPoint::new(vector, chunk, owner.clone()));
            }
            Ok(points)
        })
        .await
        .map_err(|e| anyhow::anyhow!("embedding task failed: {e}"))??;

        let chunk_count = points.len();
        self.index.upsert(points).await?;

        Ok(chunk_count)
    }
}
