use crate::dispatch::Method;
use serde::Serialize;

/// Catalog entry describing one simulator method.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MethodInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// What the `query` field means for this method.
    pub query_hint: &'static str,
}

pub const CATALOG: &[MethodInfo] = &[
    MethodInfo {
        id: "regex",
        title: "Regex Search",
        description: "Pattern-based text matching with highlighted match spans.",
        query_hint: r"a regular expression, e.g. info\w+",
    },
    MethodInfo {
        id: "vsm",
        title: "Vector Space Model",
        description: "Ranks documents by cosine similarity of TF-IDF vectors.",
        query_hint: "free text, e.g. web application security",
    },
    MethodInfo {
        id: "boolean",
        title: "Boolean Retrieval",
        description: "Queries combined with AND, OR, NOT and parentheses.",
        query_hint: "e.g. (apple OR banana) NOT cherry",
    },
    MethodInfo {
        id: "bm25",
        title: "BM25",
        description: "Probabilistic ranking with term saturation and length normalization.",
        query_hint: "free text, e.g. information retrieval evaluation",
    },
    MethodInfo {
        id: "clustering",
        title: "Document Clustering",
        description: "Groups documents with multi-start k-means++ over TF-IDF vectors.",
        query_hint: "the number of clusters, e.g. 3",
    },
    MethodInfo {
        id: "relevance",
        title: "Relevance Feedback",
        description: "Initial vector-space ranking to pick relevant documents from.",
        query_hint: "free text, e.g. machine learning",
    },
];

pub fn info(method: Method) -> &'static MethodInfo {
    let idx = match method {
        Method::Regex => 0,
        Method::Vsm => 1,
        Method::Boolean => 2,
        Method::Bm25 => 3,
        Method::Clustering => 4,
        Method::Relevance => 5,
    };
    &CATALOG[idx]
}
