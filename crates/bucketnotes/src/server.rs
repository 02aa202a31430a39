//! HTTP JSON server for the browser client.
//!
//! Every handler runs one api call on the blocking pool: the store does
//! synchronous file I/O, and each call is a full read-modify-write cycle.
//!
//! # Endpoints
//!
//! | Method   | Path | Description |
//! |----------|------|-------------|
//! | `GET`    | `/api/data` | Whole document |
//! | `POST`   | `/api/buckets` | Create a bucket `{name, keyword?}` |
//! | `DELETE` | `/api/buckets/{bucketName}` | Delete a bucket, snapshotting its notes |
//! | `GET`    | `/api/buckets/{bucketName}/notes` | Notes of one bucket, oldest first |
//! | `POST`   | `/api/deletedBuckets/restore` | Restore `{name?, id?}` |
//! | `POST`   | `/api/notes` | Create a note `{testNumber, noteText, bucketName}` |
//! | `GET`    | `/api/notes/txt` | Plain-text export, `?testNumber=&timestamp=` |
//! | `GET`    | `/api/stats/buckets` | Note count per bucket |
//! | `GET`    | `/api/testNumbers` | Per-test-number summary |
//! | `GET`    | `/api/testNumbers.csv` | The summary as a CSV attachment |
//! | `GET`    | `/api/search` | Test-number search, `?q=` |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! When `static_dir` is configured, anything else is served from it.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Bucket name cannot be empty." } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `conflict` (409),
//! `internal` (500).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use bucketnotesapp::api::{ExportFile, NotesApi};
use bucketnotesapp::config::NotesConfig;
use bucketnotesapp::error::{ErrorKind, NotesError};
use bucketnotesapp::store::DataStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
struct AppState<S: DataStore> {
    api: Arc<NotesApi<S>>,
}

impl<S: DataStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

/// Builds the router. Generic so tests can run it over an in-memory store.
pub fn router<S>(api: Arc<NotesApi<S>>, static_dir: Option<PathBuf>) -> Router
where
    S: DataStore + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/data", get(handle_data::<S>))
        .route("/api/buckets", post(handle_create_bucket::<S>))
        .route("/api/buckets/{bucket_name}", delete(handle_delete_bucket::<S>))
        .route("/api/buckets/{bucket_name}/notes", get(handle_bucket_notes::<S>))
        .route("/api/deletedBuckets/restore", post(handle_restore::<S>))
        .route("/api/notes", post(handle_create_note::<S>))
        .route("/api/notes/txt", get(handle_note_txt::<S>))
        .route("/api/stats/buckets", get(handle_bucket_stats::<S>))
        .route("/api/testNumbers", get(handle_test_numbers::<S>))
        .route("/api/testNumbers.csv", get(handle_test_numbers_csv::<S>))
        .route("/api/search", get(handle_search::<S>))
        .route("/health", get(handle_health))
        .with_state(AppState { api });

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}

/// Starts the server on the configured bind address and runs until Ctrl-C.
pub async fn serve<S>(api: NotesApi<S>, config: &NotesConfig) -> anyhow::Result<()>
where
    S: DataStore + Send + Sync + 'static,
{
    let location = api.location();
    let app = router(Arc::new(api), config.static_dir.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        document = %location.display(),
        "bucketnotes listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

/// Runs an api call on the blocking pool.
async fn blocking<S, T, F>(state: &AppState<S>, call: F) -> Result<T, AppError>
where
    S: DataStore + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&NotesApi<S>) -> bucketnotesapp::error::Result<T> + Send + 'static,
{
    let api = Arc::clone(&state.api);
    tokio::task::spawn_blocking(move || call(&api))
        .await
        .map_err(|e| internal(format!("join error: {}", e)))?
        .map_err(AppError::from)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<NotesError> for AppError {
    fn from(err: NotesError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => bad_request(message),
            ErrorKind::NotFound => not_found(message),
            ErrorKind::Conflict => AppError {
                status: StatusCode::CONFLICT,
                code: "conflict".to_string(),
                message,
            },
            ErrorKind::Internal => {
                error!(error = %message, "request failed");
                internal(message)
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

fn attachment(file: ExportFile, content_type: &'static str) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response()
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ Document and buckets ============

async fn handle_data<S>(State(state): State<AppState<S>>) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let doc = blocking(&state, |api| api.data()).await?;
    Ok(Json(doc).into_response())
}

#[derive(Deserialize)]
struct CreateBucketRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    keyword: String,
}

async fn handle_create_bucket<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateBucketRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let Json(req) = body?;
    let result = blocking(&state, move |api| api.create_bucket(&req.name, &req.keyword)).await?;
    Ok(Json(result.document).into_response())
}

async fn handle_delete_bucket<S>(
    State(state): State<AppState<S>>,
    Path(bucket_name): Path<String>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let result = blocking(&state, move |api| api.delete_bucket(&bucket_name)).await?;
    Ok(Json(result.document).into_response())
}

async fn handle_bucket_notes<S>(
    State(state): State<AppState<S>>,
    Path(bucket_name): Path<String>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let notes = blocking(&state, move |api| api.bucket_notes(&bucket_name)).await?;
    Ok(Json(notes).into_response())
}

#[derive(Deserialize)]
struct RestoreRequest {
    name: Option<String>,
    id: Option<Uuid>,
}

async fn handle_restore<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<RestoreRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let Json(req) = body?;
    let result = blocking(&state, move |api| {
        api.restore_bucket(req.name.as_deref(), req.id)
    })
    .await?;
    Ok(Json(result.document).into_response())
}

// ============ Notes ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteRequest {
    #[serde(default)]
    test_number: String,
    #[serde(default)]
    note_text: String,
    #[serde(default)]
    bucket_name: String,
}

async fn handle_create_note<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let Json(req) = body?;
    let created = blocking(&state, move |api| {
        api.create_note(&req.test_number, &req.note_text, &req.bucket_name)
    })
    .await?;
    Ok(Json(created).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteTxtQuery {
    #[serde(default)]
    test_number: String,
    #[serde(default)]
    timestamp: String,
}

async fn handle_note_txt<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<NoteTxtQuery>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let timestamp = DateTime::parse_from_rfc3339(query.timestamp.trim())
        .map_err(|e| bad_request(format!("invalid timestamp '{}': {}", query.timestamp, e)))?
        .with_timezone(&Utc);
    let test_number = query.test_number;
    let file = blocking(&state, move |api| api.export_note(&test_number, timestamp)).await?;
    Ok(attachment(file, "text/plain; charset=utf-8"))
}

// ============ Aggregates ============

async fn handle_bucket_stats<S>(State(state): State<AppState<S>>) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let counts = blocking(&state, |api| api.bucket_counts()).await?;
    Ok(Json(counts).into_response())
}

async fn handle_test_numbers<S>(State(state): State<AppState<S>>) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let rows = blocking(&state, |api| api.test_numbers()).await?;
    Ok(Json(rows).into_response())
}

async fn handle_test_numbers_csv<S>(
    State(state): State<AppState<S>>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let file = blocking(&state, |api| api.export_csv()).await?;
    Ok(attachment(file, "text/csv; charset=utf-8"))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn handle_search<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError>
where
    S: DataStore + Send + Sync + 'static,
{
    let hits = blocking(&state, move |api| api.search(&query.q)).await?;
    Ok(Json(hits).into_response())
}
