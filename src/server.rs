//! HTTP surface of the service
//!
//! Thin endpoint-to-handler wiring over the dataset facade. Success bodies
//! are `{"result": ..}` and failures `{"error": ".."}`, with the status
//! code derived from the error kind. Archive bytes arrive raw and are
//! re-encoded to base64, the canonical payload form the ingesters consume.

use crate::app::facade::DatasetManager;
use crate::app::models::DatasetKind;
use crate::{Config, Error, Result};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::body::Bytes;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::Engine;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Bind the listen address and serve requests until shutdown
pub async fn serve(config: Config, manager: Arc<DatasetManager>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(manager, config.max_archive_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::io(format!("failed to bind {addr}"), e))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::io("server failed", e))
}

/// Build the application router
pub fn router(manager: Arc<DatasetManager>, max_archive_bytes: usize) -> Router {
    Router::new()
        .route("/dataset/{id}/{kind}", put(put_dataset))
        .route("/dataset/{id}", delete(delete_dataset))
        .route("/datasets", get(list_datasets))
        .route("/query", post(post_query))
        .route("/echo/{msg}", get(echo))
        .layer(DefaultBodyLimit::max(max_archive_bytes))
        .layer(CorsLayer::permissive())
        .with_state(manager)
}

/// Facade error wrapper carrying the HTTP mapping
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::InvalidId { .. }
            | Error::InvalidContent { .. }
            | Error::InvalidQuery { .. }
            | Error::ResultTooLarge { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            // No internal detail crosses the boundary.
            Error::Io { .. } | Error::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult = std::result::Result<Json<Value>, ApiError>;

async fn put_dataset(
    State(manager): State<Arc<DatasetManager>>,
    Path((id, kind)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult {
    let kind = DatasetKind::parse(&kind)
        .ok_or_else(|| Error::invalid_content(format!("unknown dataset kind '{kind}'")))?;

    let payload = base64::engine::general_purpose::STANDARD.encode(&body);
    let ids = manager.add_dataset(&id, &payload, kind).await?;
    Ok(Json(json!({ "result": ids })))
}

async fn delete_dataset(
    State(manager): State<Arc<DatasetManager>>,
    Path(id): Path<String>,
) -> ApiResult {
    let removed = manager.remove_dataset(&id).await?;
    Ok(Json(json!({ "result": removed })))
}

async fn list_datasets(State(manager): State<Arc<DatasetManager>>) -> ApiResult {
    let listings = manager.list_datasets().await?;
    Ok(Json(json!({ "result": listings })))
}

async fn post_query(
    State(manager): State<Arc<DatasetManager>>,
    Json(query): Json<Value>,
) -> ApiResult {
    let rows = manager.perform_query(&query).await?;
    Ok(Json(json!({ "result": rows })))
}

async fn echo(Path(msg): Path<String>) -> ApiResult {
    Ok(Json(json!({ "result": format!("{msg}...{msg}") })))
}
