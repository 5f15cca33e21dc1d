use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use docrank_core::corpus::{ingest, load_documents, InputDoc};
use docrank_core::dedup::remove_duplicates;
use docrank_core::{DocId, Document, DocumentStatus, ExecutionMode, RequestQueue, SearchEngine, SearchError};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub q: String,
    pub id: DocId,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Deserialize)]
pub struct RemoveParams {
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<Document>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub id: DocId,
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub id: DocId,
    pub status: DocumentStatus,
    pub rating: i32,
    pub words: BTreeMap<String, f64>,
}

/// Shared state. Readers take the engine's read lock; add, remove and dedup take
/// the write lock, so a reader never sees an index mid-update.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchEngine>>,
    pub requests: Arc<Mutex<RequestQueue>>,
    pub admin_token: Option<String>,
}

type ApiError = (StatusCode, String);

/// Load the corpus at `input` and build the router. Reads `ADMIN_TOKEN` and
/// `CORS_ALLOW_ORIGIN` from the environment.
pub fn build_app(input: &str, stop_words: &str) -> Result<Router> {
    let mut engine = SearchEngine::from_stop_words_text(stop_words)?;
    ingest(&mut engine, load_documents(input)?)?;
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    Ok(build_router(engine, admin_token))
}

pub fn build_router(engine: SearchEngine, admin_token: Option<String>) -> Router {
    let app_state = AppState {
        engine: Arc::new(RwLock::new(engine)),
        requests: Arc::new(Mutex::new(RequestQueue::new())),
        admin_token,
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/match", get(match_handler))
        .route("/stats", get(stats_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/documents", post(add_handler))
        .route("/documents/:doc_id", delete(remove_handler))
        .route("/dedup", post(dedup_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Origins listed in `CORS_ALLOW_ORIGIN`, or any origin when unset or unparsable.
fn cors_layer() -> CorsLayer {
    let origins: Vec<_> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|list| list.split(',').filter_map(|origin| origin.trim().parse().ok()).collect())
        .unwrap_or_default();
    let allow_origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let results = {
        let engine = state.engine.read();
        state
            .requests
            .lock()
            .add_find_request_with(&engine, execution_mode(params.parallel), &params.q, params.status)
            .map_err(api_error)?
    };
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, hits = results.len(), took_s = elapsed.as_secs_f64(), "search");
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), results }))
}

pub async fn match_handler(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, ApiError> {
    let engine = state.engine.read();
    let (words, status) = engine
        .match_document(&params.q, params.id, execution_mode(params.parallel))
        .map_err(api_error)?;
    let words = words.into_iter().map(str::to_string).collect();
    Ok(Json(MatchResponse { id: params.id, words, status }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocResponse>, ApiError> {
    let engine = state.engine.read();
    let index = engine.index();
    match (index.status(doc_id), index.rating(doc_id)) {
        (Some(status), Some(rating)) => Ok(Json(DocResponse {
            id: doc_id,
            status,
            rating,
            words: index.word_frequencies(doc_id).clone(),
        })),
        _ => Err(api_error(SearchError::UnknownDocument(doc_id))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (documents, terms) = {
        let engine = state.engine.read();
        (engine.document_count(), engine.index().term_count())
    };
    let no_result_requests = state.requests.lock().no_result_requests();
    Json(serde_json::json!({
        "documents": documents,
        "terms": terms,
        "no_result_requests": no_result_requests,
    }))
}

// --- Admin endpoints ---
async fn add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(doc): Json<InputDoc>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    authorize(&state, &headers)?;
    state
        .engine
        .write()
        .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
        .map_err(api_error)?;
    tracing::info!(id = doc.id, "document added");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": doc.id }))))
}

async fn remove_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(doc_id): Path<DocId>,
    Query(params): Query<RemoveParams>,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    state.engine.write().remove_document(doc_id, execution_mode(params.parallel));
    tracing::info!(id = doc_id, "document removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn dedup_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    let removed = remove_duplicates(&mut state.engine.write());
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// Admin routes need the configured token in `X-ADMIN-TOKEN`.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(token) = state.admin_token.as_deref() else {
        return Err((StatusCode::UNAUTHORIZED, "admin routes are disabled".to_string()));
    };
    match headers.get("X-ADMIN-TOKEN").map(|value| value.to_str()) {
        Some(Ok(provided)) if provided == token => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "missing or wrong admin token".to_string())),
    }
}

fn api_error(err: SearchError) -> ApiError {
    let status = match &err {
        SearchError::UnknownDocument(_) => StatusCode::NOT_FOUND,
        SearchError::DuplicateDocumentId(_) => StatusCode::CONFLICT,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

fn execution_mode(parallel: bool) -> ExecutionMode {
    if parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    }
}
