use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::chunker::TextSplitter;
use crate::config::Config;
use crate::embeddings::{Embedder, GeminiClient};
use crate::index::{QdrantIndex, VectorIndex};
use crate::mcp::server::McpServer;
use crate::mcp::tools::{
    IngestDocumentHandler, PROFILE_ACTIONS, ProfileToolHandler, SearchDocumentsHandler,
    WebSearchHandler,
};
use crate::pipeline::IngestionPipeline;
use crate::profile::UserProfile;
use crate::search::SearchService;
use crate::websearch::TavilyClient;

/// Everything the server and CLI commands need, wired from config.
struct Services {
    pipeline: Arc<IngestionPipeline>,
    search: Arc<SearchService>,
    tavily: Arc<TavilyClient>,
    index: Arc<dyn VectorIndex>,
}

/// Build the shared services. Fails fast when the vector collection cannot
/// be reached or created.
async fn build_services(config: &Config) -> Result<Services> {
    let embedder: Arc<dyn Embedder> = Arc::new(GeminiClient::new(config)?);
    let index: Arc<dyn VectorIndex> = Arc::new(QdrantIndex::new(config)?);

    index
        .ensure_collection()
        .await
        .context("Failed to initialize vector collection")?;

    let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap);
    let pipeline = Arc::new(IngestionPipeline::new(
        Arc::clone(&embedder),
        Arc::clone(&index),
        splitter,
    ));
    let search = Arc::new(SearchService::new(Arc::clone(&embedder), Arc::clone(&index)));
    let tavily = Arc::new(TavilyClient::new(config)?);

    Ok(Services {
        pipeline,
        search,
        tavily,
        index,
    })
}

/// Start the MCP server on stdio
#[inline]
pub async fn serve_mcp() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let services = build_services(&config).await?;

    let server = Arc::new(McpServer::new(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    ));

    server
        .register_tool(
            IngestDocumentHandler::tool_definition(),
            IngestDocumentHandler::new(Arc::clone(&services.pipeline)),
        )
        .await;
    server
        .register_tool(
            SearchDocumentsHandler::tool_definition(),
            SearchDocumentsHandler::new(Arc::clone(&services.search)),
        )
        .await;
    server
        .register_tool(
            WebSearchHandler::tool_definition(),
            WebSearchHandler::new(Arc::clone(&services.tavily)),
        )
        .await;

    let profile = Arc::new(RwLock::new(UserProfile::default()));
    for action in PROFILE_ACTIONS {
        server
            .register_tool(
                ProfileToolHandler::tool_definition(action),
                ProfileToolHandler::new(Arc::clone(&profile), action),
            )
            .await;
    }

    if !services.tavily.is_configured() {
        info!("TAVILY_API_KEY not set; web_search will report it is unconfigured");
    }

    tokio::select! {
        result = Arc::clone(&server).serve_stdio() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received interrupt, shutting down");
        }
    }

    Ok(())
}

/// Ingest one file from the command line
#[inline]
pub async fn ingest_file(file_path: &str, overwrite: bool) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let services = build_services(&config).await?;

    let report = services.pipeline.ingest(file_path, overwrite).await;

    println!("{}", report.message);
    if let Some(count) = report.chunk_count {
        println!("Chunks stored: {count}");
    }

    Ok(())
}

/// Run a similarity search from the command line
#[inline]
pub async fn search_documents(query: &str, top_k: usize) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let services = build_services(&config).await?;

    let results = services.search.search(query, top_k).await;

    if results.is_empty() {
        println!("No matching chunks found.");
        return Ok(());
    }

    for (rank, chunk) in results.iter().enumerate() {
        match chunk.score {
            Some(score) => println!("{}. (score {:.4})", rank + 1, score),
            None => println!("{}.", rank + 1),
        }
        println!("{}", chunk.text);
        println!();
    }

    Ok(())
}

/// Show collection configuration and point count
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let services = build_services(&config).await?;

    let point_count = services
        .index
        .point_count()
        .await
        .context("Failed to get collection statistics")?;

    println!("Qdrant URL: {}", config.qdrant_url);
    println!("Collection: {}", config.collection_name);
    println!("Embedding model: {}", config.embed_model);
    println!(
        "Chunking: {} chars, {} overlap",
        config.chunk_size, config.chunk_overlap
    );
    println!("Stored chunks: {point_count}");
    println!(
        "Web search: {}",
        if config.tavily_api_key.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    Ok(())
}
