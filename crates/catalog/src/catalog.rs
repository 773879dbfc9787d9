//! Catalog module - the ordered list of series and its edit operations
//!
//! Mirrors the persisted JSON array one-to-one. Edits keep the array order:
//! an upsert replaces in place or appends, a removal closes the gap.

use serde_json::Value;

use crate::error::CatalogError;
use crate::types::{Episode, Series};
use crate::validate::validate_season;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    series: Vec<Series>,
}

impl Catalog {
    pub fn new(series: Vec<Series>) -> Self {
        Self { series }
    }

    /// Parse a catalog, failing on any malformed entry
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let series: Vec<Series> = serde_json::from_str(json)?;
        Ok(Self { series })
    }

    /// Parse a catalog, skipping entries without a non-empty `id` and `title`.
    ///
    /// Entries that still fail to parse are skipped too. A document that is not
    /// a JSON array yields an empty catalog; invalid JSON is still an error.
    pub fn from_json_lenient(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Array(entries) = value else {
            tracing::warn!("catalog document is not an array, treating as empty");
            return Ok(Self::default());
        };

        let total = entries.len();
        let series: Vec<Series> = entries
            .into_iter()
            .filter(is_listable_entry)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();

        if series.len() < total {
            tracing::warn!(
                dropped = total - series.len(),
                kept = series.len(),
                "skipped malformed catalog entries"
            );
        }
        Ok(Self { series })
    }

    /// Two-space indented JSON, the on-disk format
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.series)?)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn into_series(self) -> Vec<Series> {
        self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    /// Replace the series with the same id in place, or append it.
    ///
    /// Returns `true` when an existing entry was replaced.
    pub fn upsert(&mut self, series: Series) -> bool {
        match self.series.iter_mut().find(|s| s.id == series.id) {
            Some(existing) => {
                *existing = series;
                true
            }
            None => {
                self.series.push(series);
                false
            }
        }
    }

    /// Replace the entry whose id is `id` with `series`, verbatim.
    ///
    /// The body's own `id` is not checked against `id`.
    pub fn replace_at_id(&mut self, id: &str, series: Series) -> Result<(), CatalogError> {
        let slot = self
            .series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::SeriesNotFound(id.to_string()))?;
        *slot = series;
        Ok(())
    }

    /// Remove every series with this id; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.series.len();
        self.series.retain(|s| s.id != id);
        self.series.len() != before
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    pub fn season_numbers(&self, series_id: &str) -> Option<Vec<u32>> {
        self.find(series_id)
            .map(|s| s.seasons.iter().map(|season| season.season_number).collect())
    }

    /// Episode pool for one puzzle, in catalog order.
    ///
    /// Only playable seasons are returned: non-empty, unique ids, air orders
    /// exactly `1..=N`.
    pub fn episodes_for_season(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> Result<Vec<Episode>, CatalogError> {
        let series = self
            .find(series_id)
            .ok_or_else(|| CatalogError::SeriesNotFound(series_id.to_string()))?;
        let season = series
            .season(season_number)
            .ok_or_else(|| CatalogError::SeasonNotFound {
                series_id: series_id.to_string(),
                season: season_number,
            })?;

        validate_season(season).map_err(|issue| CatalogError::InvalidSeason {
            series_id: series_id.to_string(),
            season: season_number,
            issue,
        })?;

        Ok(season.episodes.clone())
    }
}

impl From<Vec<Series>> for Catalog {
    fn from(series: Vec<Series>) -> Self {
        Self::new(series)
    }
}

fn is_listable_entry(entry: &Value) -> bool {
    let has_id = match entry.get("id") {
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    };
    let has_title = match entry.get("title") {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Object(_)) => true,
        _ => false,
    };
    has_id && has_title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, LocalizedString, Season};
    use crate::validate::SeasonIssue;

    fn series(id: &str, title: &str) -> Series {
        Series {
            id: id.to_string(),
            title: LocalizedString::from(title),
            year: None,
            poster: String::new(),
            plot: LocalizedString::default(),
            seasons: Vec::new(),
        }
    }

    #[test]
    fn test_upsert_replaces_in_place_or_appends() {
        let mut catalog = Catalog::new(vec![series("a", "A"), series("b", "B")]);

        assert!(catalog.upsert(series("a", "A2")));
        assert!(!catalog.upsert(series("c", "C")));

        let ids: Vec<&str> = catalog.series().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(catalog.find("a").map(|s| s.title.text(Language::En)), Some("A2"));
    }

    #[test]
    fn test_replace_at_id_is_verbatim() {
        let mut catalog = Catalog::new(vec![series("a", "A")]);
        catalog.replace_at_id("a", series("z", "Z")).unwrap();
        assert_eq!(catalog.series()[0].id, "z");

        let err = catalog.replace_at_id("a", series("a", "A")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut catalog = Catalog::new(vec![series("a", "A"), series("b", "B")]);
        assert!(catalog.remove("a"));
        assert!(!catalog.remove("a"));
        assert_eq!(catalog.len(), 1);
        catalog.clear();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_lenient_parse_drops_unlistable_entries() {
        let json = r#"[
            {"id": "a", "title": "A"},
            {"id": "", "title": "Nameless"},
            {"title": "No id"},
            {"id": "b", "title": ""},
            {"id": "c", "title": {"en": "C", "es": "C"}},
            {"id": "d", "title": "D", "seasons": "broken"},
            42
        ]"#;

        let catalog = Catalog::from_json_lenient(json).unwrap();
        let ids: Vec<&str> = catalog.series().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        assert!(Catalog::from_json(json).is_err());
        assert!(Catalog::from_json_lenient("{}").unwrap().is_empty());
        assert!(Catalog::from_json_lenient("not json").is_err());
    }

    #[test]
    fn test_pretty_output_uses_two_spaces() {
        let catalog = Catalog::new(vec![series("a", "A")]);
        let json = catalog.to_json_pretty().unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": \"a\""));
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn test_episodes_for_season() {
        let mut s = series("tt1", "Show");
        s.seasons = vec![
            Season {
                season_number: 1,
                episodes: vec![
                    Episode::new("tt1-S1E2", 2, "Two"),
                    Episode::new("tt1-S1E1", 1, "One"),
                ],
            },
            Season {
                season_number: 2,
                episodes: vec![Episode::new("tt1-S2E1", 0, "Unknown")],
            },
        ];
        let catalog = Catalog::new(vec![s]);

        let pool = catalog.episodes_for_season("tt1", 1).unwrap();
        assert_eq!(pool[0].id, "tt1-S1E2");
        assert_eq!(catalog.season_numbers("tt1"), Some(vec![1, 2]));

        match catalog.episodes_for_season("tt1", 2) {
            Err(CatalogError::InvalidSeason { issue, .. }) => {
                assert!(matches!(issue, SeasonIssue::AirOrderOutOfRange { air_order: 0, .. }))
            }
            other => panic!("expected invalid season, got {:?}", other),
        }
        assert!(matches!(
            catalog.episodes_for_season("tt1", 3),
            Err(CatalogError::SeasonNotFound { season: 3, .. })
        ));
        assert!(matches!(
            catalog.episodes_for_season("nope", 1),
            Err(CatalogError::SeriesNotFound(_))
        ));
    }
}
