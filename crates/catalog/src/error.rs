use std::path::PathBuf;

use thiserror::Error;

use crate::validate::SeasonIssue;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid catalog service url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("catalog service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("series not found: {0}")]
    SeriesNotFound(String),
    #[error("season {season} not found in series {series_id}")]
    SeasonNotFound { series_id: String, season: u32 },
    #[error("season {season} of series {series_id} is not playable: {issue}")]
    InvalidSeason {
        series_id: String,
        season: u32,
        issue: SeasonIssue,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::SeriesNotFound(_) | CatalogError::SeasonNotFound { .. }
        )
    }
}
