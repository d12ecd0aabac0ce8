//! Tunable engine parameters.
//!
//! The defaults are the values the simulator ships with; the server and CLI
//! override individual fields from their command-line flags.

use serde::{Deserialize, Serialize};

pub const BM25_K1: f64 = 1.5;
pub const BM25_B: f64 = 0.75;
/// Independent k-means++ starts per clustering call.
pub const KMEANS_N_INIT: usize = 10;
/// Lloyd rounds per start.
pub const KMEANS_MAX_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: BM25_K1, b: BM25_B }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    pub n_init: usize,
    pub max_iterations: usize,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self { n_init: KMEANS_N_INIT, max_iterations: KMEANS_MAX_ITERATIONS, seed: None }
    }
}

/// Inverse-document-frequency variant used for TF-IDF vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfWeighting {
    /// `ln(N / (1 + df))`. Zero or negative once a term appears in half the corpus.
    Plain,
    /// `ln((1 + N) / (1 + df)) + 1`. Always positive.
    #[default]
    Smoothed,
}

impl IdfWeighting {
    pub fn idf(self, num_docs: usize, df: usize) -> f64 {
        let n = num_docs as f64;
        let df = df as f64;
        match self {
            IdfWeighting::Plain => (n / (1.0 + df)).ln(),
            IdfWeighting::Smoothed => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bm25: Bm25Params,
    pub kmeans: KMeansParams,
    pub idf: IdfWeighting,
}
