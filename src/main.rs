use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use treerag::config::Config;
use treerag::dataset;
use treerag::embedder::HashEmbedder;
use treerag::generator::groq::GroqGenerator;
use treerag::hierarchy::TopicHierarchy;
use treerag::pipeline::Pipeline;
use treerag::retriever::store::VectorStore;

/// Demo queries exercised when no query is given on the command line,
/// including out-of-context and ambiguous ones.
const DEMO_QUERIES: [&str; 7] = [
    "What are the main regulations protecting healthcare data?",
    "Tell me about technical safeguards for healthcare data.",
    "What is healthcare data privacy?",
    "What are the consequences of data breaches in healthcare?",
    "What is the history of medical informatics in ancient civilizations?",
    "Can you explain quantum mechanics in simple terms?",
    "What about data security?",
];

#[derive(Parser, Debug)]
#[command(version, about = "Hierarchical context-tree RAG demo")]
struct Args {
    /// Question to answer; runs the built-in demo queries when omitted
    query: Option<String>,

    /// Path to the JSON config file
    #[arg(short, long, default_value = "")]
    config: String,

    /// Override the number of passages to retrieve per query
    #[arg(short = 'k', long)]
    top_k: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(k) = args.top_k {
        config.search_top_k = k;
    }
    config.validate().context("invalid configuration")?;
    let api_key = config.api_key()?;

    let corpus = dataset::builtin_corpus();
    info!("Corpus ready: {} passages", corpus.len());

    // Malformed taxonomy (a hash filed twice, a repeated topic name) is a
    // startup failure, not something to discover mid-query.
    let hierarchy =
        TopicHierarchy::build(dataset::topic_spec()).context("invalid topic hierarchy")?;
    info!("Topic hierarchy ready: {} passages filed", hierarchy.coverage());

    let mut store = VectorStore::open(&config.db_path, Box::new(HashEmbedder::default()))
        .context("failed to open vector store")?;
    store.ingest(&corpus).context("corpus ingestion failed")?;

    let generator =
        GroqGenerator::new(api_key, &config.generation).context("failed to build generator")?;

    let pipeline = Pipeline::new(
        corpus,
        hierarchy,
        Box::new(store),
        Box::new(generator),
        config.search_top_k,
    );

    match args.query {
        Some(query) => run_query(&pipeline, &query),
        None => {
            for (i, query) in DEMO_QUERIES.iter().enumerate() {
                println!("\nQUERY {}: \"{query}\"", i + 1);
                run_query(&pipeline, query)?;
                println!("{}", "-".repeat(50));
            }
            Ok(())
        }
    }
}

fn run_query(pipeline: &Pipeline, query: &str) -> Result<()> {
    let answer = pipeline
        .answer(query)
        .with_context(|| format!("query failed: \"{query}\""))?;
    println!("\n{answer}");
    Ok(())
}
