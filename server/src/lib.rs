use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use moviefind_core::{search_hits, Index, IndexBuilder, IndexStats, TokenizerConfig};
use moviefind_indexer::{load_corpus, MovieCatalog, MovieRecord};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub corpus: PathBuf,
    pub tokenizer: TokenizerConfig,
    pub default_k: usize,
    pub max_k: usize,
    pub admin_token: Option<String>,
}

/// A built index together with the catalog loaded from the same feed.
pub struct Snapshot {
    pub index: Index,
    pub catalog: MovieCatalog,
    pub built_at: String,
}

impl Snapshot {
    pub fn load(corpus: &FsPath, tokenizer: TokenizerConfig) -> Result<Self> {
        let (corpus, catalog) = load_corpus(corpus)?;
        let index = IndexBuilder::new().tokenizer(tokenizer).build(&corpus)?;
        let built_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
        Ok(Self { index, catalog, built_at })
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    rebuild: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(config: ServerConfig, snapshot: Snapshot) -> Self {
        Self {
            config: Arc::new(config),
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            rebuild: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// The currently published snapshot. Callers keep it even if a rebuild swaps it out.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    pub title: Option<String>,
    pub link: Option<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: IndexStats,
    pub built_at: String,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": msg.into() })))
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let snapshot = Snapshot::load(&config.corpus, config.tokenizer)?;
    let stats = snapshot.index.stats();
    tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, "index ready");
    Ok(router(AppState::new(config, snapshot)))
}

pub fn router(state: AppState) -> Router {
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
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/movies/:id", get(movie_handler))
        .route("/stats", get(stats_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let k = params.k.unwrap_or(state.config.default_k).min(state.config.max_k);
    let snapshot = state.snapshot();
    let hits = search_hits(&snapshot.index, &params.q, k)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    // Title lookup happens here, once per returned id.
    let results: Vec<SearchHit> = hits
        .into_iter()
        .map(|hit| {
            let meta = snapshot.catalog.get(hit.id);
            SearchHit {
                id: hit.id.to_string(),
                score: hit.score,
                title: meta.map(|m| m.title.clone()),
                link: meta.and_then(|m| m.link.clone()),
            }
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, k, hits = results.len(), "search");
    Ok(Json(SearchResponse {
        query: params.q,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

pub async fn movie_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MovieRecord>, ApiError> {
    let snapshot = state.snapshot();
    snapshot
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("movie {id} not found")))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.snapshot();
    Json(StatsResponse { stats: snapshot.index.stats(), built_at: snapshot.built_at.clone() })
}

/// Rebuild from the configured corpus path and swap the new snapshot in.
/// On failure the published snapshot stays as it was.
async fn rebuild_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StatsResponse>, ApiError> {
    authorize(&state, &headers)?;
    let _guard = state.rebuild.lock().await;

    let config = state.config.clone();
    let snapshot = tokio::task::spawn_blocking(move || Snapshot::load(&config.corpus, config.tokenizer))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::warn!(error = %format!("{e:#}"), "index rebuild failed");
            api_error(StatusCode::UNPROCESSABLE_ENTITY, format!("{e:#}"))
        })?;

    let response = StatsResponse { stats: snapshot.index.stats(), built_at: snapshot.built_at.clone() };
    state.publish(snapshot);
    tracing::info!(num_docs = response.stats.num_docs, num_terms = response.stats.num_terms, "published rebuilt index");
    Ok(Json(response))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.config.admin_token {
        Some(t) => t,
        None => return Err(api_error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}
