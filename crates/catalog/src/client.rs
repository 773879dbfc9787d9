//! Catalog client - HTTP access to the catalog service with offline fallbacks
//!
//! Reads try the service, then the bundled static snapshot, then the local
//! cache. Writes try the service and fall back to applying the same edit to
//! the local cache. Every result says which source served it.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Method, Response, Url};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::local::LocalCache;
use crate::store::CatalogStore;
use crate::types::Series;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSource {
    Service,
    Snapshot,
    LocalCache,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Service => "service",
            CatalogSource::Snapshot => "snapshot",
            CatalogSource::LocalCache => "local-cache",
        }
    }
}

/// A value together with the source that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: CatalogSource,
}

impl<T> Sourced<T> {
    fn new(value: T, source: CatalogSource) -> Self {
        Self { value, source }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    snapshot: Option<PathBuf>,
    cache: LocalCache,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, cache: LocalCache) -> Result<Self, CatalogError> {
        let raw = base_url.into();
        let invalid = |reason: String| CatalogError::InvalidUrl {
            url: raw.clone(),
            reason,
        };
        let mut base_url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        base_url
            .path_segments_mut()
            .map_err(|()| invalid("not a base url".to_string()))?
            .pop_if_empty();

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            snapshot: None,
            cache,
        })
    }

    /// Use a bundled catalog snapshot as the second read source
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Base url with `segments` appended, each percent-encoded
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Series>,
    ) -> Result<Response, CatalogError> {
        let mut request = self.http.request(method, self.url(segments));
        if let Some(series) = body {
            request = request.json(series);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);
        Err(CatalogError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_service(&self) -> Result<Catalog, CatalogError> {
        let response = self.send(Method::GET, &["series"], None).await?;
        let text = response.text().await?;
        Catalog::from_json_lenient(&text)
    }

    async fn read_snapshot(&self) -> Option<Catalog> {
        let path = self.snapshot.as_ref()?;
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no catalog snapshot");
                return None;
            }
        };
        match Catalog::from_json_lenient(&raw) {
            Ok(catalog) if !catalog.is_empty() => Some(catalog),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "catalog snapshot is not valid json");
                None
            }
        }
    }

    /// Full catalog from the first source that has one
    pub async fn get_all_series(&self) -> Result<Sourced<Catalog>, CatalogError> {
        match self.fetch_service().await {
            Ok(catalog) => return Ok(Sourced::new(catalog, CatalogSource::Service)),
            Err(e) => tracing::warn!(error = %e, "catalog service unavailable, trying snapshot"),
        }

        if let Some(catalog) = self.read_snapshot().await {
            tracing::info!(series = catalog.len(), "loaded catalog from snapshot");
            if let Err(e) = self.cache.save(&catalog) {
                tracing::warn!(error = %e, "could not copy snapshot into local cache");
            }
            return Ok(Sourced::new(catalog, CatalogSource::Snapshot));
        }

        let catalog = self.cache.load()?;
        Ok(Sourced::new(catalog, CatalogSource::LocalCache))
    }

    /// Create or replace a series
    pub async fn save_series(&self, series: &Series) -> Result<Sourced<()>, CatalogError> {
        match self.send(Method::POST, &["series"], Some(series)).await {
            Ok(_) => Ok(Sourced::new((), CatalogSource::Service)),
            Err(e) => {
                tracing::warn!(id = %series.id, error = %e, "save failed, writing local cache");
                self.cache.save_series(series.clone())?;
                Ok(Sourced::new((), CatalogSource::LocalCache))
            }
        }
    }

    /// Replace the series stored under `id`.
    ///
    /// Any service failure (a missing id included) falls back to the local
    /// cache, where a missing id leaves the cache untouched.
    pub async fn update_series(&self, id: &str, series: &Series) -> Result<Sourced<()>, CatalogError> {
        match self.send(Method::PUT, &["series", id], Some(series)).await {
            Ok(_) => Ok(Sourced::new((), CatalogSource::Service)),
            Err(e) => {
                tracing::warn!(id, error = %e, "update failed, writing local cache");
                match self.cache.update_series(id, series.clone()) {
                    Ok(()) => {}
                    Err(CatalogError::SeriesNotFound(_)) => {
                        tracing::debug!(id, "series not in local cache, nothing to update");
                    }
                    Err(e) => return Err(e),
                }
                Ok(Sourced::new((), CatalogSource::LocalCache))
            }
        }
    }

    pub async fn delete_series(&self, id: &str) -> Result<Sourced<()>, CatalogError> {
        match self.send(Method::DELETE, &["series", id], None).await {
            Ok(_) => Ok(Sourced::new((), CatalogSource::Service)),
            Err(e) => {
                tracing::warn!(id, error = %e, "delete failed, writing local cache");
                self.cache.delete_series(id)?;
                Ok(Sourced::new((), CatalogSource::LocalCache))
            }
        }
    }

    pub async fn clear_all_series(&self) -> Result<Sourced<()>, CatalogError> {
        match self.send(Method::DELETE, &["series"], None).await {
            Ok(_) => Ok(Sourced::new((), CatalogSource::Service)),
            Err(e) => {
                tracing::warn!(error = %e, "clear failed, clearing local cache");
                self.cache.clear()?;
                Ok(Sourced::new((), CatalogSource::LocalCache))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalizedString;

    fn series(id: &str) -> Series {
        Series {
            id: id.to_string(),
            title: LocalizedString::from("Show"),
            year: None,
            poster: String::new(),
            plot: LocalizedString::default(),
            seasons: Vec::new(),
        }
    }

    /// Port 9 on localhost: nothing listens, connections are refused
    fn offline_client(dir: &std::path::Path) -> CatalogClient {
        CatalogClient::new("http://127.0.0.1:9/api/", LocalCache::new(dir.join("cache"))).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let client = offline_client(dir.path());
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
        assert_eq!(client.url(&["series"]).as_str(), "http://127.0.0.1:9/api/series");
    }

    #[test]
    fn test_series_id_is_percent_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let client = offline_client(dir.path());
        assert_eq!(
            client.url(&["series", "a/b?c#d"]).as_str(),
            "http://127.0.0.1:9/api/series/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"));
        assert!(matches!(
            CatalogClient::new("not a url", cache.clone()),
            Err(CatalogError::InvalidUrl { .. })
        ));
        assert!(matches!(
            CatalogClient::new("mailto:someone@example.com", cache),
            Err(CatalogError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_offline_reads_fall_back_to_snapshot_then_cache() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        let client = offline_client(dir.path()).with_snapshot(&snapshot);

        let got = client.get_all_series().await.unwrap();
        assert_eq!(got.source, CatalogSource::LocalCache);
        assert!(got.value.is_empty());

        std::fs::write(&snapshot, r#"[{"id":"tt1","title":"Show"}]"#).unwrap();
        let got = client.get_all_series().await.unwrap();
        assert_eq!(got.source, CatalogSource::Snapshot);
        assert_eq!(got.value.len(), 1);
        // Snapshot data is copied into the local cache.
        assert_eq!(client.cache().load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_served_when_cache_is_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, r#"[{"id":"tt1","title":"Show"}]"#).unwrap();
        // A regular file where the cache directory should be.
        std::fs::write(dir.path().join("cache"), "not a directory").unwrap();
        let client = offline_client(dir.path()).with_snapshot(&snapshot);

        let got = client.get_all_series().await.unwrap();
        assert_eq!(got.source, CatalogSource::Snapshot);
        assert_eq!(got.value.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_writes_go_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let client = offline_client(dir.path());

        let saved = client.save_series(&series("a")).await.unwrap();
        assert_eq!(saved.source, CatalogSource::LocalCache);
        client.save_series(&series("b")).await.unwrap();

        let mut renamed = series("a");
        renamed.title = LocalizedString::from("Renamed");
        client.update_series("a", &renamed).await.unwrap();
        // Unknown id is tolerated offline.
        client.update_series("zzz", &series("zzz")).await.unwrap();

        client.delete_series("b").await.unwrap();
        let cached = client.cache().load().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached.series()[0].title, LocalizedString::from("Renamed"));

        client.clear_all_series().await.unwrap();
        assert!(client.get_all_series().await.unwrap().value.is_empty());
    }
}
