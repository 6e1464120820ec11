//! MCP Tools Implementation
//!
//! Concrete tool implementations: document ingestion, similarity search,
//! live web search, and user profile management.

use crate::mcp::protocol::*;
use crate::mcp::server::ToolHandler;
use crate::pipeline::{IngestStatus, IngestionPipeline};
use crate::profile::UserProfile;
use crate::search::SearchService;
use crate::websearch::TavilyClient;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const DEFAULT_TOP_K: usize = 5;

/// Document ingestion tool handler
pub struct IngestDocumentHandler {
    pipeline: Arc<IngestionPipeline>,
}

impl IngestDocumentHandler {
    #[inline]
    pub fn new(pipeline: Arc<IngestionPipeline>) -> Self {
        Self { pipeline }
    }

    /// Create the ingest_document tool definition
    #[inline]
    pub fn tool_definition() -> Tool {
        Tool {
            name: "ingest_document".to_string(),
            description: Some(
                "Add a document (PDF, Word, image, or plain text) to the knowledge base"
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path to the file to ingest"
                    },
                    "overwrite": {
                        "type": "boolean",
                        "description": "Replace previously ingested chunks for this path (default: true)"
                    }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl ToolHandler for IngestDocumentHandler {
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let args = params.arguments.unwrap_or_default();

        let file_path = args
            .get("file_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing required parameter: file_path"))?;
        let overwrite = args
            .get("overwrite")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        debug!("Ingesting document: {} (overwrite: {})", file_path, overwrite);

        let report = self.pipeline.ingest(file_path, overwrite).await;
        let is_error = report.status == IngestStatus::Error;
        let text = serde_json::to_string_pretty(&report)?;

        Ok(CallToolResult {
            content: vec![ToolContent::Text { text }],
            is_error: Some(is_error),
        })
    }
}

/// Similarity search tool handler
pub struct SearchDocumentsHandler {
    search: Arc<SearchService>,
}

impl SearchDocumentsHandler {
    #[inline]
    pub fn new(search: Arc<SearchService>) -> Self {
        Self { search }
    }

    /// Create the search_documents tool definition
    #[inline]
    pub fn tool_definition() -> Tool {
        Tool {
            name: "search_documents".to_string(),
            description: Some("Search the knowledge base for relevant document chunks".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "top_k": {
                        "type": "integer",
                        "description": "Maximum number of chunks to return (default: 5)"
                    }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl ToolHandler for SearchDocumentsHandler {
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let args = params.arguments.unwrap_or_default();

        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing required parameter: query"))?;
        let top_k = args
            .get("top_k")
            .and_then(|v| v.as_i64())
            .unwrap_or(DEFAULT_TOP_K as i64)
            .max(1) as usize;

        debug!("Searching documents: query='{}', top_k={}", query, top_k);

        let results = self.search.search(query, top_k).await;
        let response = json!({ "results": results });

        Ok(CallToolResult::text(serde_json::to_string_pretty(
            &response,
        )?))
    }
}

/// Live web search tool handler
pub struct WebSearchHandler {
    client: Arc<TavilyClient>,
}

impl WebSearchHandler {
    #[inline]
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }

    /// Create the web_search tool definition
    #[inline]
    pub fn tool_definition() -> Tool {
        Tool {
            name: "web_search".to_string(),
            description: Some("Search the live web for current information".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl ToolHandler for WebSearchHandler {
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let args = params.arguments.unwrap_or_default();

        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing required parameter: query"))?
            .to_string();

        debug!("Web search: '{}'", query);

        let client = Arc::clone(&self.client);
        let outcome = tokio::task::spawn_blocking(move || client.search(&query)).await?;

        match outcome {
            Ok(hits) => {
                let response = json!({ "results": hits });
                Ok(CallToolResult::text(serde_json::to_string_pretty(
                    &response,
                )?))
            }
            Err(e) => Ok(CallToolResult::error(format!("Web search failed: {e}"))),
        }
    }
}

/// Which profile field a registered profile tool updates or reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    SetName,
    SetAge,
    SetLocation,
    AddInterest,
    SetPreference,
    GetSummary,
}

/// User profile tool handler; one instance is registered per action.
pub struct ProfileToolHandler {
    profile: Arc<RwLock<UserProfile>>,
    action: ProfileAction,
}

impl ProfileToolHandler {
    #[inline]
    pub fn new(profile: Arc<RwLock<UserProfile>>, action: ProfileAction) -> Self {
        Self { profile, action }
    }

    /// Create the tool definition for one profile action
    #[inline]
    pub fn tool_definition(action: ProfileAction) -> Tool {
        match action {
            ProfileAction::SetName => Tool {
                name: "update_user_name".to_string(),
                description: Some("Set the user's name".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "The user's name" }
                    },
                    "required": ["name"],
                    "additionalProperties": false
                }),
            },
            ProfileAction::SetAge => Tool {
                name: "update_user_age".to_string(),
                description: Some("Set the user's age".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "age": { "type": "integer", "description": "The user's age in years" }
                    },
                    "required": ["age"],
                    "additionalProperties": false
                }),
            },
            ProfileAction::SetLocation => Tool {
                name: "update_user_location".to_string(),
                description: Some("Set the user's location".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "location": { "type": "string", "description": "Where the user lives" }
                    },
                    "required": ["location"],
                    "additionalProperties": false
                }),
            },
            ProfileAction::AddInterest => Tool {
                name: "add_user_interest".to_string(),
                description: Some("Record one of the user's interests".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "interest": { "type": "string", "description": "The interest to record" }
                    },
                    "required": ["interest"],
                    "additionalProperties": false
                }),
            },
            ProfileAction::SetPreference => Tool {
                name: "set_user_preference".to_string(),
                description: Some("Store a user preference as a key/value pair".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "key": { "type": "string", "description": "Preference name" },
                        "value": { "type": "string", "description": "Preference value" }
                    },
                    "required": ["key", "value"],
                    "additionalProperties": false
                }),
            },
            ProfileAction::GetSummary => Tool {
                name: "get_user_profile".to_string(),
                description: Some("Get the stored user profile as a context block".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false
                }),
            },
        }
    }
}

#[async_trait]
impl ToolHandler for ProfileToolHandler {
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let args = params.arguments.unwrap_or_default();

        let message = match self.action {
            ProfileAction::SetName => {
                let name = args
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Missing required parameter: name"))?;
                self.profile.write().await.set_name(name);
                format!("Updated name to {}", name.trim())
            }
            ProfileAction::SetAge => {
                let age = args
                    .get("age")
                    .and_then(|v| v.as_u64())
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| anyhow!("Missing or invalid parameter: age"))?;
                self.profile.write().await.set_age(age);
                format!("Updated age to {age}")
            }
            ProfileAction::SetLocation => {
                let location = args
                    .get("location")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Missing required parameter: location"))?;
                self.profile.write().await.set_location(location);
                format!("Updated location to {}", location.trim())
            }
            ProfileAction::AddInterest => {
                let interest = args
                    .get("interest")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Missing required parameter: interest"))?;
                self.profile.write().await.add_interest(interest);
                format!("Added interest: {}", interest.trim())
            }
            ProfileAction::SetPreference => {
                let key = args
                    .get("key")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Missing required parameter: key"))?;
                let value = args
                    .get("value")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Missing required parameter: value"))?;
                self.profile.write().await.set_preference(key, value);
                format!("Set preference {} = {}", key.trim(), value.trim())
            }
            ProfileAction::GetSummary => {
                let summary = self.profile.read().await.summary();
                return Ok(CallToolResult::text(summary));
            }
        };

        let response = json!({ "status": "success", "message": message });
        Ok(CallToolResult::text(serde_json::to_string_pretty(
            &response,
        )?))
    }
}

/// Every profile action, in registration order.
pub const PROFILE_ACTIONS: [ProfileAction; 6] = [
    ProfileAction::SetName,
    ProfileAction::SetAge,
    ProfileAction::SetLocation,
    ProfileAction::AddInterest,
    ProfileAction::SetPreference,
    ProfileAction::GetSummary,
];
