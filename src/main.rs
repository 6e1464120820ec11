use clap::{Parser, Subcommand};
use knowledge_mcp::Result;
use knowledge_mcp::commands::{ingest_file, search_documents, serve_mcp, show_status};

#[derive(Parser)]
#[command(name = "knowledge-mcp")]
#[command(about = "A document knowledge base with vector retrieval, web search, and MCP server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio
    Serve,
    /// Ingest a file into the knowledge base
    Ingest {
        /// Path to the file to ingest
        file: String,
        /// Keep previously ingested chunks for this path instead of replacing them
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Search the knowledge base
    Search {
        /// Search query
        query: String,
        /// Maximum number of chunks to return
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
    /// Show collection status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            serve_mcp().await?;
        }
        Commands::Ingest { file, no_overwrite } => {
            ingest_file(&file, !no_overwrite).await?;
        }
        Commands::Search { query, top_k } => {
            search_documents(&query, top_k).await?;
        }
        Commands::Status => {
            show_status().await?;
        }
    }

    Ok(())
}
