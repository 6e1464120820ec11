//! Vector collection management on top of Qdrant.

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, DeletePointsBuilder,
    Distance, FieldType, Filter, PointStruct, SearchPointsBuilder, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{Config, EMBEDDING_DIMENSION};
use crate::{KnowledgeError, Result};

const CONNECT_TIMEOUT_SECONDS: u64 = 30;

/// One embedded chunk ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub text: String,
    pub file_path: String,
}

impl ChunkPoint {
    #[inline]
    pub fn new(vector: Vec<f32>, text: String, file_path: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            text,
            file_path,
        }
    }
}

/// A scored match returned from a similarity query. `text` is absent when
/// the stored point carries no text payload.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub score: f32,
    pub text: Option<String>,
}

/// Storage seam for the ingestion pipeline and search service. The
/// production implementation talks to Qdrant; tests substitute an
/// in-memory index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection and its payload index if they do not exist.
    async fn ensure_collection(&self) -> Result<()>;

    /// Remove every point whose `file_path` payload matches exactly.
    async fn delete_by_file_path(&self, file_path: &str) -> Result<()>;

    async fn upsert(&self, points: Vec<ChunkPoint>) -> Result<()>;

    /// Top-k nearest neighbors by cosine similarity, best first.
    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<QueryHit>>;

    async fn point_count(&self) -> Result<u64>;
}

pub struct QdrantIndex {
    client: Qdrant,
    collection_name: String,
    dimension: usize,
}

impl QdrantIndex {
    pub fn new(config: &Config) -> Result<Self> {
        info!("Connecting to Qdrant at {}", config.qdrant_url);

        let mut builder =
            Qdrant::from_url(&config.qdrant_url).timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS));
        if let Some(api_key) = &config.qdrant_api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| KnowledgeError::Index(format!("failed to create Qdrant client: {e}")))?;

        Ok(Self {
            client,
            collection_name: config.collection_name.clone(),
            dimension: EMBEDDING_DIMENSION,
        })
    }

    async fn collection_exists(&self) -> Result<bool> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| KnowledgeError::Index(format!("failed to list collections: {e}")))?;

        Ok(collections
            .collections
            .iter()
            .any(|c| c.name == self.collection_name))
    }

    /// Whether the collection already has a payload index on `file_path`.
    async fn has_file_path_index(&self) -> Result<bool> {
        let info = self
            .client
            .collection_info(&self.collection_name)
            .await
            .map_err(|e| KnowledgeError::Index(format!("failed to get collection info: {e}")))?;

        Ok(info
            .result
            .is_some_and(|r| r.payload_schema.contains_key("file_path")))
    }
}

/// Convert a chunk into the stored point representation. The payload
/// carries the chunk text and the source path used for scoped deletes.
fn to_point_struct(point: ChunkPoint) -> PointStruct {
    let mut payload = HashMap::new();
    payload.insert("text".to_string(), Value::from(point.text));
    payload.insert("file_path".to_string(), Value::from(point.file_path));

    PointStruct::new(point.id.to_string(), point.vector, payload)
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self) -> Result<()> {
        if !self.collection_exists().await? {
            info!(
                "Creating collection '{}' ({} dimensions, cosine)",
                self.collection_name, self.dimension
            );

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| {
                    KnowledgeError::Index(format!("failed to create collection: {e}"))
                })?;
        }

        // The keyword index makes delete-by-path filters efficient; it may
        // be missing on collections created by older versions.
        if !self.has_file_path_index().await? {
            info!(
                "Creating keyword payload index on file_path for '{}'",
                self.collection_name
            );

            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    "file_path",
                    FieldType::Keyword,
                ))
                .await
                .map_err(|e| {
                    KnowledgeError::Index(format!("failed to create payload index: {e}"))
                })?;
        }

        Ok(())
    }

    async fn delete_by_file_path(&self, file_path: &str) -> Result<()> {
        debug!(
            "Deleting points for file_path={} from '{}'",
            file_path, self.collection_name
        );

        let filter = Filter::must([Condition::matches("file_path", file_path.to_string())]);

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name)
                    .points(filter)
                    .wait(true),
            )
            .await
            .map_err(|e| KnowledgeError::Index(format!("failed to delete points: {e}")))?;

        Ok(())
    }

    async fn upsert(&self, points: Vec<ChunkPoint>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        debug!(
            "Upserting {} points into '{}'",
            points.len(),
            self.collection_name
        );

        for point in &points {
            if point.vector.len() != self.dimension {
                return Err(KnowledgeError::Index(format!(
                    "point {} has {} dimensions, expected {}",
                    point.id,
                    point.vector.len(),
                    self.dimension
                )));
            }
        }

        let points: Vec<PointStruct> = points.into_iter().map(to_point_struct).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .map_err(|e| KnowledgeError::Index(format!("failed to upsert points: {e}")))?;

        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<QueryHit>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection_name, vector, top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| KnowledgeError::Index(format!("search failed: {e}")))?;

        let hits = response
            .result
            .into_iter()
            .map(|scored| QueryHit {
                score: scored.score,
                text: scored
                    .payload
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            })
            .collect();

        Ok(hits)
    }

    async fn point_count(&self) -> Result<u64> {
        let info = self
            .client
            .collection_info(&self.collection_name)
            .await
            .map_err(|e| KnowledgeError::Index(format!("failed to get collection info: {e}")))?;

        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }
}
