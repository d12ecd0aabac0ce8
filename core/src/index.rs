use crate::tokenizer::tokenize;
use crate::Document;
use std::collections::{HashMap, HashSet};

/// Stemmed token sequences of a corpus plus per-term document frequencies.
///
/// Built once per method invocation and dropped with it.
#[derive(Debug, Default)]
pub struct AnalyzedCorpus {
    /// One token sequence per document, in corpus order.
    pub tokens: Vec<Vec<String>>,
    /// Number of documents containing each term.
    pub df: HashMap<String, usize>,
}

impl AnalyzedCorpus {
    pub fn new(documents: &[Document]) -> Self {
        let tokens: Vec<Vec<String>> = documents.iter().map(|d| tokenize(&d.content)).collect();
        let mut df: HashMap<String, usize> = HashMap::new();
        for seq in &tokens {
            let seen: HashSet<&String> = seq.iter().collect();
            for term in seen {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }
        Self { tokens, df }
    }

    pub fn num_docs(&self) -> usize { self.tokens.len() }

    pub fn doc_freq(&self, term: &str) -> usize { self.df.get(term).copied().unwrap_or(0) }

    /// Mean token-sequence length; zero for an empty corpus.
    pub fn average_doc_length(&self) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let total: usize = self.tokens.iter().map(Vec::len).sum();
        total as f64 / self.tokens.len() as f64
    }
}

/// Term counts of one token sequence.
pub fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    counts
}
