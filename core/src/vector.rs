//! TF-IDF vectors over a shared vocabulary, and the similarity primitives
//! used by the vector-space ranker and the clustering engine.

use crate::config::IdfWeighting;
use crate::index::{term_counts, AnalyzedCorpus};
use std::collections::HashMap;

/// Ordered set of terms. Every vector built against one vocabulary is indexed
/// by the same positions.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self { Self::default() }

    /// Build from token sequences; terms are numbered by first appearance.
    pub fn from_sequences<'a, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut vocab = Self::new();
        for seq in sequences {
            for term in seq {
                vocab.insert(term);
            }
        }
        vocab
    }

    pub fn insert(&mut self, term: &str) -> usize {
        if let Some(&pos) = self.positions.get(term) {
            return pos;
        }
        let pos = self.terms.len();
        self.terms.push(term.to_string());
        self.positions.insert(term.to_string(), pos);
        pos
    }

    pub fn position(&self, term: &str) -> Option<usize> { self.positions.get(term).copied() }

    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

/// IDF for every vocabulary term, aligned with vocabulary positions.
pub fn idf_weights(vocab: &Vocabulary, corpus: &AnalyzedCorpus, weighting: IdfWeighting) -> Vec<f64> {
    let n = corpus.num_docs();
    vocab.terms().iter().map(|t| weighting.idf(n, corpus.doc_freq(t))).collect()
}

/// `(count / len) * idf` per term. An empty sequence yields the zero vector.
pub fn tfidf_vector(tokens: &[String], vocab: &Vocabulary, idf: &[f64]) -> Vec<f64> {
    let mut vec = vec![0.0; vocab.len()];
    if tokens.is_empty() {
        return vec;
    }
    let len = tokens.len() as f64;
    for (term, count) in term_counts(tokens) {
        if let Some(pos) = vocab.position(term) {
            vec[pos] = (count as f64 / len) * idf[pos];
        }
    }
    vec
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Cosine of the angle between two vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let na = norm(a);
    let nb = norm(b);
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (na * nb)).clamp(-1.0, 1.0)
}

#[inline]
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}
