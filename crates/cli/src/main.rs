//! Ragbox CLI
//!
//! Main entry point for the ragbox command-line tool.
//! Provides commands for document ingestion and retrieval-augmented
//! question answering against a local vector store.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, IngestCommand};
use ragbox_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Ragbox CLI - retrieval-augmented answering over local documents
#[derive(Parser, Debug)]
#[command(name = "ragbox")]
#[command(about = "Retrieval-augmented answering over local documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "RAGBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Vector store backend (milvus, memory)
    #[arg(short, long, global = true)]
    store: Option<String>,

    /// Collection name
    #[arg(long, global = true, env = "RAGBOX_COLLECTION")]
    collection: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a document into the vector store
    Ingest(IngestCommand),

    /// Ask a single question against the indexed corpus
    Ask(AskCommand),

    /// Interactive session: ingest the document, then answer questions
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.store,
        cli.collection,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Ragbox CLI starting");
    tracing::debug!("Store backend: {}", config.store.backend);
    tracing::debug!("Collection: {}", config.store.collection);
    tracing::debug!("Embedding model: {}", config.embedding.model);

    // Emit command span
    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
