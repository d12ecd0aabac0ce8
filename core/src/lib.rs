//! Retrieval, ranking and clustering engine behind the simulator.
//!
//! A corpus string is split into [`Document`]s by [`corpus::parse_documents`]
//! and handed to one of five methods through [`dispatch::Engine`]: literal
//! pattern matching, vector-space ranking, boolean retrieval, BM25 ranking and
//! k-means clustering.

pub mod bm25;
pub mod boolean;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod methods;
pub mod pattern;
pub mod tokenizer;
pub mod vector;
pub mod vsm;

use serde::Serialize;

pub use config::EngineConfig;
pub use dispatch::{Engine, Method, ResultEnvelope, SimulationRequest};
pub use error::{EngineError, Result};

/// 1-based position of a document in its corpus.
pub type DocId = u32;

/// One named document of a corpus. Order in the corpus is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn to_ref(&self) -> DocumentRef {
        DocumentRef { doc_id: self.id, name: self.name.clone(), content: self.content.clone() }
    }
}

/// A document reported without a score (boolean matches, cluster members).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub doc_id: DocId,
    pub name: String,
    pub content: String,
}

/// A document with its ranking score (VSM, BM25, relevance feedback).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDocument {
    pub doc_id: DocId,
    pub name: String,
    pub score: f64,
    pub content: String,
}

/// Pair documents with scores and sort by descending score.
/// The sort is stable, so equal scores keep corpus order.
pub(crate) fn rank(documents: &[Document], scores: Vec<f64>) -> Vec<RankedDocument> {
    let mut ranked: Vec<RankedDocument> = documents
        .iter()
        .zip(scores)
        .map(|(doc, score)| RankedDocument {
            doc_id: doc.id,
            name: doc.name.clone(),
            score,
            content: doc.content.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}
