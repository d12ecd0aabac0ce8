//! Request validation and routing to the five methods.
//!
//! [`Engine::simulate`] is the boundary: whatever happens inside, the caller
//! gets exactly one [`ResultEnvelope`].

use crate::boolean::search_boolean;
use crate::bm25::rank_bm25;
use crate::cluster::{cluster_documents, parse_cluster_count};
use crate::config::EngineConfig;
use crate::corpus::parse_documents;
use crate::error::{EngineError, Result};
use crate::pattern::{search_pattern, PatternMatch};
use crate::vsm::rank_vsm;
use crate::{Document, DocumentRef, RankedDocument};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

pub const NO_PATTERN_MATCHES: &str = "No matches were found for the given regular expression.";
pub const RELEVANCE_FEEDBACK_NOTE: &str = "This is the initial ranking. Iterative refinement from documents \
     marked as relevant is not implemented; pick relevant documents from this list to refine the query by hand.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Regex,
    Vsm,
    Boolean,
    Bm25,
    Clustering,
    Relevance,
}

type Handler = fn(&Engine, &str, &[Document]) -> Result<ResultEnvelope>;

impl Method {
    pub const ALL: [Method; 6] =
        [Method::Regex, Method::Vsm, Method::Boolean, Method::Bm25, Method::Clustering, Method::Relevance];

    pub fn id(self) -> &'static str {
        match self {
            Method::Regex => "regex",
            Method::Vsm => "vsm",
            Method::Boolean => "boolean",
            Method::Bm25 => "bm25",
            Method::Clustering => "clustering",
            Method::Relevance => "relevance",
        }
    }

    fn handler(self) -> Handler {
        match self {
            Method::Regex => run_regex,
            Method::Vsm => run_vsm,
            Method::Boolean => run_boolean,
            Method::Bm25 => run_bm25,
            Method::Clustering => run_clustering,
            Method::Relevance => run_relevance,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.id()) }
}

impl FromStr for Method {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| EngineError::UnknownMethod(s.to_string()))
    }
}

/// One engine call: a method identifier, a query and a raw corpus string.
/// For clustering the query carries the cluster count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub method_id: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub documents: String,
}

impl SimulationRequest {
    pub fn new(method_id: impl Into<String>, query: impl Into<String>, documents: impl Into<String>) -> Self {
        Self { method_id: method_id.into(), query: query.into(), documents: documents.into() }
    }
}

/// Uniform result of every engine call. Only the fields relevant to the
/// method that ran are set; an error envelope carries `error` alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<PatternMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranked_documents: Option<Vec<RankedDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_documents: Option<Vec<DocumentRef>>,
    /// Keyed by cluster index; serialized with string keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<BTreeMap<usize, Vec<DocumentRef>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_clusters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inertia: Option<f64>,
}

impl ResultEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Self::default() }
    }

    pub fn is_error(&self) -> bool { self.error.is_some() }
}

impl From<EngineError> for ResultEnvelope {
    fn from(err: EngineError) -> Self { Self::error(err.to_string()) }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self { Self { config } }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Validate, route and run one request. Never fails: errors come back as
    /// an envelope with only `error` set.
    pub fn simulate(&self, request: &SimulationRequest) -> ResultEnvelope {
        let start = Instant::now();
        let envelope = match self.try_simulate(request) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(method = %request.method_id, error = %err, "simulation failed");
                err.into()
            }
        };
        tracing::info!(
            method = %request.method_id,
            ok = !envelope.is_error(),
            took_ms = start.elapsed().as_millis() as u64,
            "simulation finished"
        );
        envelope
    }

    fn try_simulate(&self, request: &SimulationRequest) -> Result<ResultEnvelope> {
        let documents = parse_documents(&request.documents);
        if documents.iter().all(|d| d.content.trim().is_empty()) {
            return Err(EngineError::EmptyCorpus);
        }
        let method: Method = request.method_id.parse()?;
        tracing::debug!(%method, documents = documents.len(), "dispatching");
        self.run_method(method, &request.query, &documents)
    }

    /// Run `method` over already-parsed documents.
    pub fn run_method(&self, method: Method, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
        (method.handler())(self, query, documents)
    }

    fn rng(&self) -> StdRng {
        match self.config.kmeans.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn run_regex(_engine: &Engine, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
    let matches = search_pattern(query, documents)?;
    if matches.is_empty() {
        return Ok(ResultEnvelope { message: Some(NO_PATTERN_MATCHES.to_string()), ..Default::default() });
    }
    Ok(ResultEnvelope { matches: Some(matches), ..Default::default() })
}

fn run_vsm(engine: &Engine, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
    let ranked = rank_vsm(query, documents, engine.config.idf);
    Ok(ResultEnvelope { ranked_documents: Some(ranked), ..Default::default() })
}

fn run_boolean(_engine: &Engine, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
    let matched = search_boolean(query, documents)?;
    Ok(ResultEnvelope { matched_documents: Some(matched), ..Default::default() })
}

fn run_bm25(engine: &Engine, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
    let ranked = rank_bm25(query, documents, engine.config.bm25);
    Ok(ResultEnvelope { ranked_documents: Some(ranked), ..Default::default() })
}

fn run_clustering(engine: &Engine, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
    let k = parse_cluster_count(query)?;
    let mut rng = engine.rng();
    let result = cluster_documents(documents, k, &engine.config.kmeans, engine.config.idf, &mut rng)?;
    Ok(ResultEnvelope {
        clusters: Some(result.clusters),
        num_clusters: Some(result.num_clusters),
        inertia: Some(result.inertia),
        ..Default::default()
    })
}

fn run_relevance(engine: &Engine, query: &str, documents: &[Document]) -> Result<ResultEnvelope> {
    let mut envelope = run_vsm(engine, query, documents)?;
    envelope.message = Some(RELEVANCE_FEEDBACK_NOTE.to_string());
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "--- Document: D1 ---\ncats are great pets\n--- Document: D2 ---\ndogs are loyal animals";

    #[test]
    fn method_ids_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.id().parse::<Method>().unwrap(), method);
        }
        assert_eq!("VSM".parse::<Method>(), Err(EngineError::UnknownMethod("VSM".into())));
    }

    #[test]
    fn unknown_method_is_an_error_envelope() {
        let env = Engine::default().simulate(&SimulationRequest::new("lsi", "cats", CORPUS));
        assert_eq!(env, ResultEnvelope::error("unrecognized method: \"lsi\""));
    }

    #[test]
    fn empty_corpus_checked_before_method() {
        let env = Engine::default().simulate(&SimulationRequest::new("lsi", "cats", "   "));
        assert_eq!(env, ResultEnvelope::error(EngineError::EmptyCorpus.to_string()));
    }

    #[test]
    fn header_only_corpus_is_empty() {
        let env = Engine::default().simulate(&SimulationRequest::new("vsm", "cats", "--- Document: A ---\n"));
        assert!(env.is_error());
    }

    #[test]
    fn relevance_is_vsm_plus_note() {
        let engine = Engine::default();
        let vsm = engine.simulate(&SimulationRequest::new("vsm", "cats", CORPUS));
        let rel = engine.simulate(&SimulationRequest::new("relevance", "cats", CORPUS));
        assert_eq!(rel.ranked_documents, vsm.ranked_documents);
        assert_eq!(rel.message.as_deref(), Some(RELEVANCE_FEEDBACK_NOTE));
        assert!(vsm.message.is_none());
    }

    #[test]
    fn regex_without_matches_is_a_message() {
        let env = Engine::default().simulate(&SimulationRequest::new("regex", "zebra", CORPUS));
        assert_eq!(env.message.as_deref(), Some(NO_PATTERN_MATCHES));
        assert!(env.error.is_none());
        assert!(env.matches.is_none());
    }

    #[test]
    fn envelope_serializes_only_set_fields() {
        let json = serde_json::to_value(ResultEnvelope::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));

        let mut clusters = BTreeMap::new();
        clusters.insert(1, vec![DocumentRef { doc_id: 2, name: "B".into(), content: "b".into() }]);
        let env = ResultEnvelope { clusters: Some(clusters), num_clusters: Some(2), ..Default::default() };
        let json = serde_json::to_value(env).unwrap();
        assert_eq!(json["clusters"]["1"][0]["docId"], 2);
        assert_eq!(json["numClusters"], 2);
    }

    #[test]
    fn request_uses_camel_case() {
        let req: SimulationRequest =
            serde_json::from_str(r#"{"methodId":"bm25","query":"q","documents":"d"}"#).unwrap();
        assert_eq!(req.method_id, "bm25");
    }
}
