//! famdocs - ask questions about ingested family documents.
//!
//! ```bash
//! famdocs ingest ./inbox --sender mum@example.com
//! famdocs ask 'query="Sem-1 and Sem-4 SGPA", top_k=8'
//! famdocs search "SGPA less than 8.5" --json
//! famdocs list
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use famdocs_answer::{metadata_table, Answer, ExtractiveSummarizer, SearchTool};
use famdocs_core::config::{Config, Settings};
use famdocs_core::ingest::{DataProcessor, Provenance};
use famdocs_embed::get_default_embedder;
use famdocs_rank::{RetrievalOptions, Retriever};
use famdocs_vector::MemoryVectorStore;

#[derive(Parser)]
#[command(name = "famdocs")]
#[command(about = "Question answering over ingested family documents")]
#[command(version)]
struct Cli {
    /// Store snapshot to use instead of the configured `store.path`
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk, embed and store a file or every .txt/.md file under a directory
    Ingest {
        path: PathBuf,

        #[arg(long, default_value = "")]
        sender: String,

        #[arg(long, default_value = "")]
        subject: String,
    },

    /// Answer a question; accepts `query="...", top_k=N`, JSON, or plain text
    Ask {
        input: String,
    },

    /// Run retrieval only and print per-document context and confidence
    Search {
        query: String,

        /// Candidates to request from vector search (0 = configured default)
        #[arg(short, long, default_value = "0")]
        k: usize,

        /// Print the retrieval result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List ingested documents
    List,

    /// Remove one document and its chunks
    Delete {
        document_id: String,
    },

    /// Remove every stored document
    Clear,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_env("FAMDOCS_LOG").unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn open_store(path: &Path, settings: &Settings) -> Result<MemoryVectorStore> {
    let embedder = get_default_embedder(settings.embedding.dim)?;
    MemoryVectorStore::load(path, embedder).with_context(|| format!("opening store {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    init_tracing(&settings);

    let store_path = cli.store.clone().unwrap_or_else(|| settings.store.resolved_path());

    match cli.command {
        Commands::Ingest { path, sender, subject } => {
            let processor = DataProcessor::with_chunking(settings.chunking.clone())?;
            let provenance = Provenance { sender, subject };
            let documents = if path.is_dir() {
                processor.process_directory(&path, &provenance)?
            } else {
                processor.process_file(&path, &provenance)?.into_iter().collect()
            };
            let mut store = open_store(&store_path, &settings)?;
            let pb = ProgressBar::new(documents.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?
                    .progress_chars("#>-"),
            );
            let mut chunk_total = 0usize;
            for doc in documents {
                pb.set_message(doc.metadata.filename.clone());
                chunk_total += store.index_document(doc)?;
                pb.inc(1);
            }
            pb.finish_and_clear();
            store.save(&store_path)?;
            println!("Ingest complete: {} chunks, {} documents in {}", chunk_total, store.documents().len(), store_path.display());
        }
        Commands::Ask { input } => {
            let store = open_store(&store_path, &settings)?;
            let retriever = Retriever::with_options(store, RetrievalOptions::from(&settings.retrieval));
            let tool = SearchTool::new(retriever, ExtractiveSummarizer::default());
            println!("{}", tool.run(&input));
        }
        Commands::Search { query, k, json } => {
            let store = open_store(&store_path, &settings)?;
            let retriever = Retriever::with_options(store, RetrievalOptions::from(&settings.retrieval));
            let result = retriever.retrieve(&query, k)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let answer = Answer { query, result, summary: None, synthesis_error: None };
                println!("{}", answer.render());
            }
        }
        Commands::List => {
            let store = open_store(&store_path, &settings)?;
            println!("{}", metadata_table(store.documents()));
        }
        Commands::Delete { document_id } => {
            let mut store = open_store(&store_path, &settings)?;
            let removed = store.delete_document(&document_id);
            if removed == 0 {
                return Err(famdocs_core::Error::NotFound(format!("document {document_id}")).into());
            }
            store.save(&store_path)?;
            println!("Deleted {} chunks for document {}", removed, document_id);
        }
        Commands::Clear => {
            let mut store = open_store(&store_path, &settings)?;
            let removed = store.clear();
            store.save(&store_path)?;
            println!("Deleted all documents ({} chunks)", removed);
        }
    }
    Ok(())
}
