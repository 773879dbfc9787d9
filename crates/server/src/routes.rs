//! HTTP routes for the catalog service
//!
//! | Method | Path | Effect |
//! |--------|------|--------|
//! | GET | `/api/series` | Whole catalog |
//! | POST | `/api/series` | Upsert by id |
//! | DELETE | `/api/series` | Clear the catalog |
//! | PUT | `/api/series/:id` | Replace the entry at `id` with the body |
//! | DELETE | `/api/series/:id` | Remove `id` (idempotent) |
//! | GET | `/healthz` | Liveness |

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::{season_issues, CatalogError, CatalogStore};
use crate::types::Series;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn CatalogStore>,
    /// Shared by reads, exclusive across each read-modify-write; last write wins
    write_lock: Arc<RwLock<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(RwLock::new(())),
        }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Run a store call on the blocking pool
    async fn with_store<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CatalogStore) -> Result<T, CatalogError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let out = tokio::task::spawn_blocking(move || f(store.as_ref())).await??;
        Ok(out)
    }
}

/// Failure responses; the body is always `{"error": <message>}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error reading series data")]
    Read(#[source] anyhow::Error),
    #[error("Error saving series")]
    Save(#[source] anyhow::Error),
    #[error("Error updating series")]
    Update(#[source] anyhow::Error),
    #[error("Series not found")]
    NotFound,
    #[error("Error deleting series")]
    Delete(#[source] anyhow::Error),
    #[error("Error clearing series")]
    Clear(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Some(source) = std::error::Error::source(&self) {
            tracing::error!(error = %source, "{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/series",
            get(list_series).post(save_series).delete(clear_series),
        )
        .route("/api/series/:id", put(update_series).delete(delete_series))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_series(State(state): State<AppState>) -> Result<Json<Vec<Series>>, ApiError> {
    let _guard = state.write_lock.read().await;
    let catalog = state
        .with_store(|store| store.load())
        .await
        .map_err(ApiError::Read)?;
    Ok(Json(catalog.into_series()))
}

async fn save_series(
    State(state): State<AppState>,
    Json(series): Json<Series>,
) -> Result<Json<serde_json::Value>, ApiError> {
    warn_unplayable(&series);

    let _guard = state.write_lock.write().await;
    let stored = series.clone();
    state
        .with_store(move |store| store.save_series(stored))
        .await
        .map_err(ApiError::Save)?;

    tracing::info!(id = %series.id, "series saved");
    Ok(Json(json!({ "success": true, "series": series })))
}

async fn update_series(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(series): Json<Series>,
) -> Result<Json<serde_json::Value>, ApiError> {
    warn_unplayable(&series);

    let _guard = state.write_lock.write().await;
    let stored = series.clone();
    let target = id.clone();
    state
        .with_store(move |store| store.update_series(&target, stored))
        .await
        .map_err(|e| {
            let missing = matches!(
                e.downcast_ref::<CatalogError>(),
                Some(CatalogError::SeriesNotFound(_))
            );
            if missing {
                ApiError::NotFound
            } else {
                ApiError::Update(e)
            }
        })?;

    tracing::info!(%id, "series updated");
    Ok(Json(json!({ "success": true, "series": series })))
}

async fn delete_series(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let _guard = state.write_lock.write().await;
    let target = id.clone();
    let removed = state
        .with_store(move |store| store.delete_series(&target))
        .await
        .map_err(ApiError::Delete)?;

    tracing::info!(%id, removed, "series deleted");
    Ok(Json(json!({ "success": true })))
}

async fn clear_series(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let _guard = state.write_lock.write().await;
    state
        .with_store(|store| store.clear())
        .await
        .map_err(ApiError::Clear)?;

    tracing::info!("catalog cleared");
    Ok(Json(json!({ "success": true })))
}

/// Writes are never refused for unplayable seasons, only logged
fn warn_unplayable(series: &Series) {
    for season in &series.seasons {
        let issues = season_issues(season);
        if let Some(first) = issues.first() {
            tracing::warn!(
                id = %series.id,
                season = season.season_number,
                issues = issues.len(),
                first = %first,
                "season is not playable"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, JsonFileStore, MemoryStore};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(catalog: Catalog) -> Router {
        router(AppState::new(Arc::new(MemoryStore::new(catalog))), 1024 * 1024)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (status, body) = call(app_with(Catalog::default()), "GET", "/api/series", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_post_echoes_body() {
        let app = app_with(Catalog::default());
        let (status, body) = call(
            app.clone(),
            "POST",
            "/api/series",
            Some(r#"{"id":"tt1","title":"Show","seasons":[]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["series"]["id"], json!("tt1"));

        let (_, list) = call(app, "GET", "/api/series", None).await;
        assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    }

    #[tokio::test]
    async fn test_put_missing_is_404() {
        let (status, body) = call(
            app_with(Catalog::default()),
            "PUT",
            "/api/series/nope",
            Some(r#"{"id":"nope","title":"X"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Series not found" }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let app = app_with(Catalog::default());
        let (status, body) = call(app, "DELETE", "/api/series/never-existed", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_during_writes_always_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("series.json")).unwrap();
        let app = router(AppState::new(Arc::new(store)), 16 * 1024 * 1024);

        let plot = "y".repeat(128 * 1024);
        let writer = {
            let app = app.clone();
            tokio::spawn(async move {
                for i in 0..20 {
                    let body = json!({ "id": format!("tt{}", i % 4), "title": "Show", "plot": plot });
                    let (status, _) = call(app.clone(), "POST", "/api/series", Some(&body.to_string())).await;
                    assert_eq!(status, StatusCode::OK);
                }
            })
        };

        let mut reads = 0;
        while !writer.is_finished() {
            let (status, body) = call(app.clone(), "GET", "/api/series", None).await;
            assert_eq!(status, StatusCode::OK, "read failed: {}", body);
            reads += 1;
        }
        writer.await.unwrap();
        assert!(reads > 0);

        let (_, list) = call(app, "GET", "/api/series", None).await;
        assert_eq!(list.as_array().map(|a| a.len()), Some(4));
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = app_with(Catalog::default());
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }

    #[test]
    fn test_api_error_status() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Read(anyhow::anyhow!("disk")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Clear(anyhow::anyhow!("x")).to_string(), "Error clearing series");
    }
}
