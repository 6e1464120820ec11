
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::embeddings::{Embedder, TaskKind};
use crate::index::VectorIndex;
use crate::Result;

/// One retrieved chunk of context. Points stored without a text payload
/// come back with an empty string rather than being dropped, so ranks stay
/// aligned with the index's scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Similarity search over the document collection.
pub struct SearchService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl SearchService {
    #[inline]
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Return the `top_k` most similar chunks, best first. Failures degrade
    /// to a single chunk carrying the error message, so a broken index
    /// never takes the conversation down with it.
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        match self.search_inner(query, top_k).await {
            Ok(chunks) => {
                debug!("Search for '{}' returned {} chunks", query, chunks.len());
                chunks
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                vec![RetrievedChunk {
                    text: format!("Error searching documents: {e}"),
                    score: None,
                }]
            }
        }
    }

    async fn search_inner(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let embedder = Arc::clone(&self.embedder);
        let owned_query = query.to_string();
        let vector =
            tokio::task::spawn_blocking(move || embedder.embed(&owned_query, TaskKind::Query))
                .await
                .map_err(|e| anyhow::anyhow!("embedding task failed: {e}"))??;

        let hits = self.index.query(vector, top_k).await?;

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedChunk {
                text: hit.text.unwrap_or_default(),
                score: Some(hit.score),
            })
            .collect())
    }
}
