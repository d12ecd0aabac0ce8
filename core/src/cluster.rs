//! Multi-start k-means++ over TF-IDF document vectors with cosine distance.
//!
//! Each start seeds centroids with k-means++ and refines them with Lloyd
//! iterations; the start with the lowest inertia is kept.

use crate::config::{IdfWeighting, KMeansParams};
use crate::error::{EngineError, Result};
use crate::index::AnalyzedCorpus;
use crate::vector::{cosine_distance, cosine_similarity, idf_weights, tfidf_vector, Vocabulary};
use crate::{Document, DocumentRef};
use rand::Rng;
use std::collections::BTreeMap;

/// One candidate solution from a single random start.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansRun {
    /// Cluster index per document, in corpus order.
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared cosine distances to the assigned centroids.
    pub inertia: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Non-empty clusters only, members in corpus order.
    pub clusters: BTreeMap<usize, Vec<DocumentRef>>,
    /// The requested cluster count.
    pub num_clusters: usize,
    pub inertia: f64,
}

/// Parse the requested cluster count from user text.
pub fn parse_cluster_count(raw: &str) -> Result<usize> {
    match raw.trim().parse::<i64>() {
        Ok(k) if k > 0 => usize::try_from(k).map_err(|_| EngineError::InvalidClusterCount(raw.to_string())),
        _ => Err(EngineError::InvalidClusterCount(raw.to_string())),
    }
}

/// TF-IDF vectors of every document over the corpus's own vocabulary.
pub fn document_vectors(corpus: &AnalyzedCorpus, weighting: IdfWeighting) -> Vec<Vec<f64>> {
    let vocab = Vocabulary::from_sequences(corpus.tokens.iter().map(Vec::as_slice));
    let idf = idf_weights(&vocab, corpus, weighting);
    corpus.tokens.iter().map(|t| tfidf_vector(t, &vocab, &idf)).collect()
}

/// Cluster `documents` into at most `k` groups.
pub fn cluster_documents<R: Rng + ?Sized>(
    documents: &[Document],
    k: usize,
    params: &KMeansParams,
    weighting: IdfWeighting,
    rng: &mut R,
) -> Result<Clustering> {
    if k == 0 {
        return Err(EngineError::InvalidClusterCount(k.to_string()));
    }
    if k > documents.len() {
        return Err(EngineError::TooFewDocuments { k, documents: documents.len() });
    }

    let corpus = AnalyzedCorpus::new(documents);
    let vectors = document_vectors(&corpus, weighting);
    let best = kmeans(&vectors, k, params, rng);
    tracing::debug!(k, inertia = best.inertia, "kept lowest-inertia run");

    let mut clusters: BTreeMap<usize, Vec<DocumentRef>> = BTreeMap::new();
    for (doc, &cluster) in documents.iter().zip(&best.assignments) {
        clusters.entry(cluster).or_default().push(doc.to_ref());
    }
    Ok(Clustering { clusters, num_clusters: k, inertia: best.inertia })
}

/// Best of `params.n_init` independent runs. `vectors` must be non-empty and
/// `1 <= k <= vectors.len()`.
pub fn kmeans<R: Rng + ?Sized>(vectors: &[Vec<f64>], k: usize, params: &KMeansParams, rng: &mut R) -> KMeansRun {
    let runs = kmeans_runs(vectors, k, params, rng);
    select_best(runs).unwrap_or_else(|| kmeans_once(vectors, k, params.max_iterations, rng))
}

pub fn kmeans_runs<R: Rng + ?Sized>(
    vectors: &[Vec<f64>],
    k: usize,
    params: &KMeansParams,
    rng: &mut R,
) -> Vec<KMeansRun> {
    (0..params.n_init.max(1)).map(|_| kmeans_once(vectors, k, params.max_iterations, rng)).collect()
}

/// Lowest inertia wins; the earliest run wins ties.
pub fn select_best(runs: Vec<KMeansRun>) -> Option<KMeansRun> {
    let mut best: Option<KMeansRun> = None;
    for run in runs {
        match &best {
            Some(b) if run.inertia >= b.inertia => {}
            _ => best = Some(run),
        }
    }
    best
}

/// A single k-means++ seeded run of up to `max_iterations` Lloyd rounds.
pub fn kmeans_once<R: Rng + ?Sized>(vectors: &[Vec<f64>], k: usize, max_iterations: usize, rng: &mut R) -> KMeansRun {
    let mut centroids = seed_centroids(vectors, k, rng);
    let mut assignments = vec![usize::MAX; vectors.len()];

    for _ in 0..max_iterations.max(1) {
        let mut changed = false;
        for (i, v) in vectors.iter().enumerate() {
            let nearest = nearest_centroid(v, &centroids);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        update_centroids(vectors, &assignments, &mut centroids);
    }

    let inertia = vectors
        .iter()
        .zip(&assignments)
        .map(|(v, &c)| {
            let d = cosine_distance(v, &centroids[c]);
            d * d
        })
        .sum();
    KMeansRun { assignments, centroids, inertia }
}

/// k-means++: first centroid uniform, the rest sampled proportionally to the
/// squared cosine distance to the nearest chosen centroid.
fn seed_centroids<R: Rng + ?Sized>(vectors: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(vectors[rng.gen_range(0..n)].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = vectors
            .iter()
            .map(|v| {
                let d = centroids.iter().map(|c| cosine_distance(v, c)).fold(f64::INFINITY, f64::min);
                d * d
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let chosen = if total > 0.0 {
            let threshold = rng.gen_range(0.0..total);
            let mut cumulative = 0.0;
            // rounding can leave the threshold just past the last bucket
            let mut chosen = weights.iter().rposition(|&w| w > 0.0).unwrap_or(n - 1);
            for (i, &w) in weights.iter().enumerate() {
                cumulative += w;
                if cumulative > threshold {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // every point coincides with a centroid
            rng.gen_range(0..n)
        };
        centroids.push(vectors[chosen].clone());
    }
    centroids
}

/// Highest cosine similarity; the lowest index wins ties.
fn nearest_centroid(v: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_sim = f64::NEG_INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let sim = cosine_similarity(v, c);
        if sim > best_sim {
            best_sim = sim;
            best = i;
        }
    }
    best
}

/// Component-wise mean of each cluster's members. Empty clusters keep their centroid.
fn update_centroids(vectors: &[Vec<f64>], assignments: &[usize], centroids: &mut [Vec<f64>]) {
    let dim = vectors.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (v, &c) in vectors.iter().zip(assignments) {
        counts[c] += 1;
        for (s, x) in sums[c].iter_mut().zip(v) {
            *s += x;
        }
    }
    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            let inv = 1.0 / count as f64;
            *centroid = sum.into_iter().map(|s| s * inv).collect();
        }
    }
}
