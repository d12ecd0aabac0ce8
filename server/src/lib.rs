use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Serialize;
use simusearch_core::methods::{MethodInfo, CATALOG};
use simusearch_core::{Engine, EngineConfig, ResultEnvelope, SimulationRequest};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub methods: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
}

pub fn build_app(config: EngineConfig) -> Router {
    let app_state = AppState { engine: Engine::new(config) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/methods", get(methods_handler))
        .route("/api/simulate", post(simulate_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", methods: CATALOG.len() })
}

pub async fn methods_handler() -> Json<&'static [MethodInfo]> {
    Json(CATALOG)
}

/// Every request gets an envelope back with status 200; failures are carried
/// in its `error` field.
pub async fn simulate_handler(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Json<ResultEnvelope> {
    tracing::debug!(method = %request.method_id, corpus_bytes = request.documents.len(), "simulate request");
    Json(state.engine.simulate(&request))
}
