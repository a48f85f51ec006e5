use anyhow::Result;
use axum::Router;
use clap::Parser;
use moviefind_indexer::TokenizerArgs;
use moviefind_server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus file or directory (JSON / JSONL movie records)
    #[arg(long, default_value = "./sample_data/movies.jsonl")]
    corpus: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Results returned when the request has no k
    #[arg(long, default_value_t = 10)]
    default_k: usize,
    /// Upper bound for k
    #[arg(long, default_value_t = 100)]
    max_k: usize,
    #[command(flatten)]
    tokenizer: TokenizerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        corpus: args.corpus,
        tokenizer: args.tokenizer.into(),
        default_k: args.default_k,
        max_k: args.max_k,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
