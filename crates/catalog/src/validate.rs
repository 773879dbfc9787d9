//! Season validation
//!
//! A season is playable when it has at least one episode, its episode ids are
//! unique and its air orders are exactly `1..=N`. Catalog writes are never
//! rejected for this; only the puzzle boundary insists on it.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::types::Season;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SeasonIssue {
    NoEpisodes,
    #[serde(rename_all = "camelCase")]
    DuplicateEpisodeId { episode_id: String },
    /// Air order outside `1..=N` (0 is what the admin tool wrote for unknown)
    #[serde(rename_all = "camelCase")]
    AirOrderOutOfRange { episode_id: String, air_order: u32 },
    #[serde(rename_all = "camelCase")]
    DuplicateAirOrder { air_order: u32 },
}

impl fmt::Display for SeasonIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonIssue::NoEpisodes => write!(f, "season has no episodes"),
            SeasonIssue::DuplicateEpisodeId { episode_id } => {
                write!(f, "episode id {} appears more than once", episode_id)
            }
            SeasonIssue::AirOrderOutOfRange {
                episode_id,
                air_order,
            } => write!(
                f,
                "episode {} has air order {} outside the season",
                episode_id, air_order
            ),
            SeasonIssue::DuplicateAirOrder { air_order } => {
                write!(f, "air order {} is used more than once", air_order)
            }
        }
    }
}

/// First problem found in a season, if any
pub fn validate_season(season: &Season) -> Result<(), SeasonIssue> {
    match season_issues(season).into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

/// Every problem found in a season, in episode order
pub fn season_issues(season: &Season) -> Vec<SeasonIssue> {
    let episodes = &season.episodes;
    if episodes.is_empty() {
        return vec![SeasonIssue::NoEpisodes];
    }

    let n = episodes.len() as u32;
    let mut issues = Vec::new();
    let mut ids = HashSet::with_capacity(episodes.len());
    let mut orders = HashSet::with_capacity(episodes.len());

    for episode in episodes {
        if !ids.insert(episode.id.as_str()) {
            issues.push(SeasonIssue::DuplicateEpisodeId {
                episode_id: episode.id.clone(),
            });
        }
        let air_order = episode.air_order();
        if air_order == 0 || air_order > n {
            issues.push(SeasonIssue::AirOrderOutOfRange {
                episode_id: episode.id.clone(),
                air_order,
            });
        } else if !orders.insert(air_order) {
            issues.push(SeasonIssue::DuplicateAirOrder { air_order });
        }
    }

    issues
}

/// Validation outcome for one season of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonReport {
    pub series_id: String,
    pub season_number: u32,
    pub episode_count: usize,
    pub issues: Vec<SeasonIssue>,
}

impl SeasonReport {
    pub fn is_playable(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every season of every series
pub fn audit(catalog: &Catalog) -> Vec<SeasonReport> {
    catalog
        .series()
        .iter()
        .flat_map(|series| {
            series.seasons.iter().map(move |season| SeasonReport {
                series_id: series.id.clone(),
                season_number: season.season_number,
                episode_count: season.episodes.len(),
                issues: season_issues(season),
            })
        })
        .collect()
}
