// 🌐 REST API with Axum
//
// Thin adapter: parse the request, call the core operation, wrap the result.
// SQLite access is serialized through one connection behind a mutex.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::entities::{Character, NewCharacter};
use crate::error::{Error, ErrorKind, ValidationError};
use crate::leaderboard::Filters;
use crate::moderation::ReportOutcome;
use crate::stats::Stats;
use crate::voting::VoteOutcome;
use crate::{db, ingest, leaderboard, matchup, moderation, stats, voting};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(conn: Connection, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config: Arc::new(config),
        }
    }

    fn with_db<T>(&self, f: impl FnOnce(&mut Connection) -> crate::Result<T>) -> Result<T, ApiError> {
        // Transactions roll back on drop, so a poisoned connection is still consistent
        let mut conn = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *conn).map_err(ApiError)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    kind: &'static str,
}

#[derive(Debug)]
pub struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if kind == ErrorKind::Store {
            tracing::error!(error = %self.0, "store failure");
        }

        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
            kind: kind.as_str(),
        };
        (status, Json(body)).into_response()
    }
}

// Extractor rejections get the same envelope and a 400
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ValidationError::MalformedRequest(rejection.body_text()).into())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(ValidationError::MalformedRequest(rejection.body_text()).into())
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Deserialize)]
struct VoteRequest {
    #[serde(default)]
    winner: String,
    #[serde(default)]
    loser: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest {
    #[serde(default)]
    character_id: String,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct CountResponse {
    count: u64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    ApiResponse::ok(HealthResponse {
        status: "OK",
        version: crate::VERSION,
    })
}

/// GET /api/characters - Two characters to compare, empty when the round reset
async fn get_matchup(State(state): State<AppState>) -> ApiResult<Vec<Character>> {
    let pair = state.with_db(matchup::select_matchup)?;
    let data = pair.map(|m| Vec::from(m.into_pair())).unwrap_or_default();
    Ok(ApiResponse::ok(data))
}

/// PUT /api/characters - Record a vote
async fn put_vote(
    State(state): State<AppState>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<VoteOutcome> {
    let Json(body) = body?;
    let outcome = state.with_db(|conn| voting::apply_vote(conn, &body.winner, &body.loser))?;
    Ok(ApiResponse::ok(outcome))
}

/// POST /api/characters - Add a character
async fn post_character(
    State(state): State<AppState>,
    body: Result<Json<NewCharacter>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Character>>), ApiError> {
    let Json(body) = body?;
    let character = state.with_db(|conn| ingest::add_character(conn, &body))?;
    Ok((StatusCode::CREATED, ApiResponse::ok(character)))
}

/// GET /api/characters/count
async fn get_count(State(state): State<AppState>) -> ApiResult<CountResponse> {
    let count = state.with_db(|conn| ingest::total_characters(conn))?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

/// GET /api/characters/search?name=
async fn search_character(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Character> {
    let Query(query) = query?;
    let character = state.with_db(|conn| ingest::search_by_name(conn, &query.name))?;
    Ok(ApiResponse::ok(character))
}

/// GET /api/characters/top?race=&bloodline=&gender=&limit=
async fn get_top(
    State(state): State<AppState>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> ApiResult<Vec<Character>> {
    let Query(mut params) = params?;
    let limit = match params.remove("limit") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError(Error::invalid_field("limit", &raw)))?,
        None => state.config.leaderboard_limit,
    };
    let filters: Filters = params;

    let top = state.with_db(|conn| leaderboard::top_ranked(conn, &filters, Some(limit)))?;
    Ok(ApiResponse::ok(top))
}

/// GET /api/characters/shame?limit=
async fn get_shame(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Vec<Character>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(state.config.leaderboard_limit);
    let bottom = state.with_db(|conn| leaderboard::bottom_ranked(conn, Some(limit)))?;
    Ok(ApiResponse::ok(bottom))
}

/// GET /api/characters/:id
async fn get_character(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> ApiResult<Character> {
    let character = state.with_db(|conn| ingest::get_character(conn, &character_id))?;
    Ok(ApiResponse::ok(character))
}

/// POST /api/characters/report
async fn post_report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> ApiResult<ReportOutcome> {
    let Json(body) = body?;
    let outcome = state.with_db(|conn| moderation::report_character(conn, &body.character_id))?;
    Ok(ApiResponse::ok(outcome))
}

/// GET /api/stats
async fn get_stats(State(state): State<AppState>) -> ApiResult<Stats> {
    let report = state.with_db(stats::compute_stats)?;
    Ok(ApiResponse::ok(report))
}

// ============================================================================
// Router / Server
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route(
            "/characters",
            get(get_matchup).put(put_vote).post(post_character),
        )
        .route("/characters/count", get(get_count))
        .route("/characters/search", get(search_character))
        .route("/characters/top", get(get_top))
        .route("/characters/shame", get(get_shame))
        .route("/characters/report", post(post_report))
        .route("/characters/:id", get(get_character))
        .route("/stats", get(get_stats))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Open the database, bind and serve until Ctrl+C / SIGTERM
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let conn = db::open_database(&config.database_path)?;
    info!(path = %config.database_path.display(), "database opened");

    let address = format!("0.0.0.0:{}", config.port);
    let app = create_router(AppState::new(conn, config));

    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
