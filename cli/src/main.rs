use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use simusearch_core::config::{Bm25Params, EngineConfig, IdfWeighting, KMeansParams};
use simusearch_core::config::{BM25_B, BM25_K1, KMEANS_MAX_ITERATIONS, KMEANS_N_INIT};
use simusearch_core::corpus::format_corpus;
use simusearch_core::methods::info;
use simusearch_core::{Engine, Method, SimulationRequest};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simusearch")]
#[command(about = "Run information-retrieval methods over a small corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one method and print the result envelope as JSON
    Simulate {
        /// Method id: regex, vsm, boolean, bm25, clustering or relevance
        #[arg(long)]
        method: String,
        /// Query text; the cluster count for clustering
        #[arg(long, default_value = "")]
        query: String,
        /// Corpus file in `--- Document: <name> ---` format, or a directory of .txt/.md files
        #[arg(long)]
        corpus: String,
        /// BM25 term-frequency saturation
        #[arg(long, default_value_t = BM25_K1)]
        k1: f64,
        /// BM25 length normalization
        #[arg(long, default_value_t = BM25_B)]
        b: f64,
        /// Independent k-means++ starts
        #[arg(long, default_value_t = KMEANS_N_INIT)]
        n_init: usize,
        /// Lloyd iterations per start
        #[arg(long, default_value_t = KMEANS_MAX_ITERATIONS)]
        max_iterations: usize,
        /// Fixed clustering seed
        #[arg(long)]
        seed: Option<u64>,
        /// Use IDF = ln(N/(1+df)) instead of the smoothed variant
        #[arg(long, default_value_t = false)]
        plain_idf: bool,
    },
    /// List the available methods
    Methods,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { method, query, corpus, k1, b, n_init, max_iterations, seed, plain_idf } => {
            let config = EngineConfig {
                bm25: Bm25Params { k1, b },
                kmeans: KMeansParams { n_init, max_iterations, seed },
                idf: if plain_idf { IdfWeighting::Plain } else { IdfWeighting::Smoothed },
            };
            let documents = load_corpus(Path::new(&corpus))?;
            let envelope = Engine::new(config).simulate(&SimulationRequest::new(method, query, documents));
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Commands::Methods => {
            for m in Method::ALL.map(info) {
                println!("{:<12} {:<22} {}", m.id, m.title, m.description);
            }
            Ok(())
        }
    }
}

/// Read a corpus string from a file, or assemble one from a directory of text files.
fn load_corpus(path: &Path) -> Result<String> {
    if path.is_file() {
        return fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    if !path.is_dir() {
        bail!("corpus path {} does not exist", path.display());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() {
            if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                if matches!(ext, "txt" | "md") {
                    files.push(p.to_path_buf());
                }
            }
        }
    }
    files.sort();

    let mut named: Vec<(String, String)> = Vec::with_capacity(files.len());
    for file in &files {
        let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        if text.trim().is_empty() {
            tracing::debug!(file = %file.display(), "skipping empty file");
            continue;
        }
        let name = file.file_name().and_then(|s| s.to_str()).unwrap_or("document").to_string();
        named.push((name, text));
    }
    tracing::info!(files = named.len(), dir = %path.display(), "assembled corpus");
    Ok(format_corpus(named.iter().map(|(n, t)| (n.as_str(), t.as_str()))))
}
