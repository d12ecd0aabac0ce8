use crate::config::IdfWeighting;
use crate::index::AnalyzedCorpus;
use crate::tokenizer::tokenize;
use crate::vector::{cosine_similarity, idf_weights, tfidf_vector, Vocabulary};
use crate::{rank, Document, RankedDocument};

/// Rank every document by cosine similarity between its TF-IDF vector and the
/// query's. The vocabulary spans query and corpus; document frequencies come
/// from the corpus only.
pub fn rank_vsm(query: &str, documents: &[Document], weighting: IdfWeighting) -> Vec<RankedDocument> {
    let corpus = AnalyzedCorpus::new(documents);
    let query_tokens = tokenize(query);

    let vocab = Vocabulary::from_sequences(
        std::iter::once(query_tokens.as_slice()).chain(corpus.tokens.iter().map(Vec::as_slice)),
    );
    let idf = idf_weights(&vocab, &corpus, weighting);
    let query_vec = tfidf_vector(&query_tokens, &vocab, &idf);
    tracing::debug!(query_terms = query_tokens.len(), vocabulary = vocab.len(), "vsm vectors");

    let scores: Vec<f64> = corpus
        .tokens
        .iter()
        .map(|tokens| cosine_similarity(&query_vec, &tfidf_vector(tokens, &vocab, &idf)))
        .collect();
    rank(documents, scores)
}
