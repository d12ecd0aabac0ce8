//! BM25 Okapi ranking.
//!
//! Scores every document against a query with configurable `k1` and `b`
//! (see [`crate::config::Bm25Params`]).

use crate::config::Bm25Params;
use crate::index::{term_counts, AnalyzedCorpus};
use crate::tokenizer::tokenize;
use crate::{rank, Document, RankedDocument};
use std::collections::HashMap;

/// Rank every document by BM25 score, highest first.
pub fn rank_bm25(query: &str, documents: &[Document], params: Bm25Params) -> Vec<RankedDocument> {
    let corpus = AnalyzedCorpus::new(documents);
    let query_tokens = tokenize(query);
    let scores = score_all(&query_tokens, &corpus, params);
    rank(documents, scores)
}

/// Raw BM25 scores in corpus order. Repeated query terms contribute once per
/// occurrence.
pub fn score_all(query_tokens: &[String], corpus: &AnalyzedCorpus, params: Bm25Params) -> Vec<f64> {
    let n = corpus.num_docs() as f64;
    let avgdl = corpus.average_doc_length();
    let Bm25Params { k1, b } = params;

    let mut idf_cache: HashMap<&str, f64> = HashMap::new();

    corpus
        .tokens
        .iter()
        .map(|doc_tokens| {
            let counts = term_counts(doc_tokens);
            let dl = doc_tokens.len() as f64;
            let mut score = 0.0;
            for term in query_tokens {
                let tf = match counts.get(term.as_str()) {
                    Some(&c) if c > 0 => c as f64,
                    _ => continue,
                };
                let idf = *idf_cache.entry(term.as_str()).or_insert_with(|| {
                    let df = corpus.doc_freq(term) as f64;
                    // IDF: ln((N - df + 0.5) / (df + 0.5) + 1)
                    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
                });
                // avgdl > 0 whenever some document contains a query term
                let tf_norm = (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / avgdl));
                score += idf * tf_norm;
            }
            score
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_documents;

    fn build_corpus() -> Vec<Document> {
        parse_documents(
            "--- Document: 0 ---\nrust programming systems language fast\n\
             --- Document: 1 ---\npython programming scripting easy\n\
             --- Document: 2 ---\njava enterprise programming verbose\n\
             --- Document: 3 ---\nrust memory safety zero cost abstractions",
        )
    }

    #[test]
    fn test_bm25_finds_matching_docs() {
        let ranked = rank_bm25("rust", &build_corpus(), Bm25Params::default());
        assert_eq!(ranked.len(), 4);
        let top: Vec<&str> = ranked.iter().take(2).map(|r| r.name.as_str()).collect();
        assert!(top.contains(&"0"));
        assert!(top.contains(&"3"));
        assert!(ranked[0].score > 0.0);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_bm25_ranking_order() {
        let docs = parse_documents("--- Document: many ---\nrust rust rust\n--- Document: one ---\nrust programming");
        let ranked = rank_bm25("rust", &docs, Bm25Params::default());
        assert_eq!(ranked[0].name, "many", "doc with higher TF should rank first");
    }

    #[test]
    fn test_bm25_matches_formula() {
        let docs = parse_documents("--- Document: a ---\napple banana\n--- Document: b ---\ncherry");
        let corpus = AnalyzedCorpus::new(&docs);
        let scores = score_all(&["apple".to_string()], &corpus, Bm25Params::default());
        // N = 2, df = 1, |d| = 2, avgdl = 1.5
        let idf = ((2.0 - 1.0 + 0.5) / (1.0 + 0.5) + 1.0f64).ln();
        let expected = idf * (1.0 * 2.5) / (1.0 + 1.5 * (1.0 - 0.75 + 0.75 * 2.0 / 1.5));
        assert!((scores[0] - expected).abs() < 1e-12);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_bm25_ties_keep_corpus_order() {
        let docs = parse_documents(
            "--- Document: A ---\nrust alpha\n--- Document: B ---\nbeta\n--- Document: C ---\nrust gamma",
        );
        let ranked = rank_bm25("rust", &docs, Bm25Params::default());
        let ids: Vec<u32> = ranked.iter().map(|r| r.doc_id).collect();
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_bm25_no_match_and_empty_docs() {
        let docs = parse_documents("--- Document: empty ---\n--- Document: full ---\nrust");
        let ranked = rank_bm25("nonexistent_xyz_term", &docs, Bm25Params::default());
        assert!(ranked.iter().all(|r| r.score == 0.0));
        let ranked = rank_bm25("rust", &docs, Bm25Params::default());
        assert_eq!(ranked[0].name, "full");
    }
}
