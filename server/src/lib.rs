use axum::{extract::{Path, Query, State}, http::HeaderMap, routing::{get, post}, Json, Router};
use boolsearch_core::source::DEFAULT_EXTENSION;
use boolsearch_core::{DirectorySource, LoadOutcome, Operator, SearchOutcome, SharedSession};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod errors;

pub use errors::ApiError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Required in `X-ADMIN-TOKEN` for load/reset; both are refused while unset.
    pub admin_token: Option<String>,
    /// Comma-separated allowed origins; any origin when unset or unparsable.
    pub cors_allow_origin: Option<String>,
    /// Extension of the files picked up by `/load`.
    pub extension: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { admin_token: None, cors_allow_origin: None, extension: DEFAULT_EXTENSION.to_string() }
    }
}

impl AppConfig {
    /// Reads `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN`.
    pub fn from_env(extension: String) -> Self {
        Self {
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
            extension,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub admin_token: Option<String>,
    pub extension: String,
}

#[derive(Deserialize)]
pub struct LoadRequest {
    pub dir: String,
}

#[derive(Serialize)]
pub struct LoadResponse {
    pub status: &'static str,
    pub total_documents: usize,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub op: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub operator: Operator,
    pub terms: Vec<String>,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct IndexSnapshot {
    pub total_terms: usize,
    pub terms: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
pub struct Stats {
    pub total_documents: usize,
    pub total_terms: usize,
}

pub fn build_app(session: SharedSession, config: AppConfig) -> Router {
    let cors = match config.cors_allow_origin.as_deref() {
        Some(val) => {
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
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let state = AppState { session, admin_token: config.admin_token, extension: config.extension };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/load", post(load_handler))
        .route("/reset", post(reset_handler))
        .route("/search", get(search_handler))
        .route("/index", get(index_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn load_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, ApiError> {
    authorize(&state, &headers)?;
    let source = DirectorySource::new(&req.dir).with_extension(&state.extension);
    let session = state.session.clone();
    // directory reads block; keep them off the async workers
    let outcome = tokio::task::spawn_blocking(move || session.load(&source))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    let resp = match outcome {
        LoadOutcome::Loaded(n) => LoadResponse { status: "loaded", total_documents: n },
        LoadOutcome::EmptyCollection => LoadResponse { status: "empty", total_documents: 0 },
    };
    Ok(Json(resp))
}

pub async fn reset_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    state.session.reset();
    Ok(Json(serde_json::json!({ "status": "reset" })))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let op: Operator = match params.op.as_deref() {
        Some(raw) => raw.parse()?,
        None => Operator::default(),
    };
    let terms = boolsearch_core::tokenizer::tokenize(&params.q);
    let results = state.session.read(|s| {
        let hits = match s.search(&params.q, op) {
            SearchOutcome::Matches(hits) => hits,
            SearchOutcome::EmptyQuery | SearchOutcome::NoMatch => return Vec::new(),
        };
        let mut results: Vec<SearchHit> = hits
            .into_iter()
            .map(|doc_id| {
                let content = s.document(&doc_id).unwrap_or_default().to_string();
                SearchHit { doc_id, content }
            })
            .collect();
        results.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
        results
    });
    Ok(Json(SearchResponse { query: params.q, operator: op, terms, total_hits: results.len(), results }))
}

pub async fn index_handler(State(state): State<AppState>) -> Json<IndexSnapshot> {
    let terms: BTreeMap<String, Vec<String>> = state.session.read(|s| {
        s.index()
            .iter()
            .map(|(term, docs)| {
                let mut docs: Vec<String> = docs.iter().cloned().collect();
                docs.sort_unstable();
                (term.clone(), docs)
            })
            .collect()
    });
    Json(IndexSnapshot { total_terms: terms.len(), terms })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<String>) -> Result<Json<SearchHit>, ApiError> {
    let content = state.session.read(|s| s.document(&doc_id).map(str::to_string));
    match content {
        Some(content) => Ok(Json(SearchHit { doc_id, content })),
        None => Err(ApiError::NotFound(format!("document {doc_id} not found"))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<Stats> {
    let stats = state.session.read(|s| Stats { total_documents: s.len(), total_terms: s.index().num_terms() });
    Json(stats)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(ApiError::Unauthorized("ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid admin token".into()))
    }
}
