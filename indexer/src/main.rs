use anyhow::Result;
use clap::{Parser, Subcommand};
use moviefind_core::{search_hits, IndexBuilder};
use moviefind_indexer::{load_corpus, TokenizerArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "moviefind-indexer")]
#[command(about = "Build a TF-IDF index over a movie corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL files or a directory and print its statistics
    Stats {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        #[command(flatten)]
        tokenizer: TokenizerArgs,
    },
    /// Build the index and print the top matches for a query
    Query {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Free-text query
        #[arg(long)]
        q: String,
        /// Number of results
        #[arg(long, default_value_t = 10)]
        k: usize,
        #[command(flatten)]
        tokenizer: TokenizerArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, tokenizer } => {
            let (corpus, _) = load_corpus(&input)?;
            let index = IndexBuilder::new().tokenizer(tokenizer.into()).build(&corpus)?;
            println!("{}", serde_json::to_string_pretty(&index.stats())?);
        }
        Commands::Query { input, q, k, tokenizer } => {
            let (corpus, catalog) = load_corpus(&input)?;
            let index = IndexBuilder::new().tokenizer(tokenizer.into()).build(&corpus)?;
            let hits = search_hits(&index, &q, k)?;
            if hits.is_empty() {
                tracing::info!(query = %q, "no matches");
            }
            for (rank, hit) in hits.iter().enumerate() {
                let title = catalog.get(hit.id).map(|m| m.title.as_str()).unwrap_or("");
                println!("{}\t{}\t{:.4}\t{}", rank + 1, hit.id, hit.score, title);
            }
        }
    }
    Ok(())
}
