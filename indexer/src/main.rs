use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use docrank_core::corpus::{ingest, load_documents};
use docrank_core::dedup::remove_duplicates;
use docrank_core::{DocId, DocumentStatus, ExecutionMode, RequestQueue, SearchEngine};
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docrank")]
#[command(about = "Search an in-memory TF-IDF index built from JSON/JSONL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (file or directory of .json / .jsonl documents)
    #[arg(long)]
    input: String,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for one or more queries
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Query text; repeat the flag to run several queries
        #[arg(long, required = true)]
        query: Vec<String>,
        /// Only documents with this status (ACTUAL, IRRELEVANT, BANNED, REMOVED)
        #[arg(long, default_value = "ACTUAL")]
        status: DocumentStatus,
        /// Score plus-terms on the rayon pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Show which query terms occur in a document
    Match {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocId,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Remove documents whose term sets duplicate an earlier document
    Dedup {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Print document and term counts
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    id: DocId,
    words: Vec<&'a str>,
    status: DocumentStatus,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, status, parallel } => {
            let engine = load_engine(&corpus)?;
            let mut requests = RequestQueue::new();
            let mode = execution_mode(parallel);
            for raw_query in &query {
                let start = Instant::now();
                let docs = requests.add_find_request_with(&engine, mode, raw_query, status)?;
                tracing::info!(query = %raw_query, hits = docs.len(), elapsed_ms = start.elapsed().as_millis() as u64, "search");
                println!("{}", serde_json::to_string(&serde_json::json!({ "query": raw_query, "results": docs }))?);
            }
            tracing::info!(no_result_requests = requests.no_result_requests(), "done");
        }
        Commands::Match { corpus, query, id, parallel } => {
            let engine = load_engine(&corpus)?;
            let start = Instant::now();
            let (words, status) = engine.match_document(&query, id, execution_mode(parallel))?;
            tracing::info!(id, elapsed_ms = start.elapsed().as_millis() as u64, "match");
            println!("{}", serde_json::to_string(&MatchOutput { id, words, status })?);
        }
        Commands::Dedup { corpus } => {
            let mut engine = load_engine(&corpus)?;
            let removed = remove_duplicates(&mut engine);
            println!("{}", serde_json::to_string(&serde_json::json!({ "removed": removed, "remaining": engine.document_count() }))?);
        }
        Commands::Stats { corpus } => {
            let engine = load_engine(&corpus)?;
            let index = engine.index();
            println!(
                "{}",
                serde_json::to_string(&serde_json::json!({
                    "documents": index.document_count(),
                    "terms": index.term_count(),
                    "stop_words": index.stop_words().len(),
                }))?
            );
        }
    }
    Ok(())
}

fn load_engine(corpus: &CorpusArgs) -> Result<SearchEngine> {
    let start = Instant::now();
    let mut engine = SearchEngine::from_stop_words_text(&corpus.stop_words)?;
    let docs = load_documents(&corpus.input)?;
    if docs.is_empty() {
        bail!("no documents found in {}", corpus.input);
    }
    ingest(&mut engine, docs)?;
    tracing::info!(input = %corpus.input, elapsed_ms = start.elapsed().as_millis() as u64, "index build complete");
    Ok(engine)
}

fn execution_mode(parallel: bool) -> ExecutionMode {
    if parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    }
}
