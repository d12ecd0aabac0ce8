use anyhow::Result;
use axum::Router;
use clap::Parser;
use simusearch_core::config::{Bm25Params, EngineConfig, IdfWeighting, KMeansParams};
use simusearch_core::config::{BM25_B, BM25_K1, KMEANS_MAX_ITERATIONS, KMEANS_N_INIT};
use simusearch_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "simusearch-server")]
#[command(about = "Serve the information-retrieval simulator over HTTP")]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = BM25_K1)]
    k1: f64,
    /// BM25 length normalization
    #[arg(long, default_value_t = BM25_B)]
    b: f64,
    /// Independent k-means++ starts per clustering request
    #[arg(long, default_value_t = KMEANS_N_INIT)]
    n_init: usize,
    /// Lloyd iterations per start
    #[arg(long, default_value_t = KMEANS_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Fixed clustering seed for reproducible results
    #[arg(long)]
    seed: Option<u64>,
    /// Use IDF = ln(N/(1+df)) instead of the smoothed ln((1+N)/(1+df)) + 1
    #[arg(long, default_value_t = false)]
    plain_idf: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            bm25: Bm25Params { k1: self.k1, b: self.b },
            kmeans: KMeansParams { n_init: self.n_init, max_iterations: self.max_iterations, seed: self.seed },
            idf: if self.plain_idf { IdfWeighting::Plain } else { IdfWeighting::Smoothed },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app: Router = build_app(args.engine_config());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
