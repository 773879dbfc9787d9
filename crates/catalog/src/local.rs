//! Local cache - the client's offline copy of the catalog
//!
//! A directory with one JSON file per key. Saves always write the primary and
//! the backup key with identical content; loads read the primary, then the
//! backup, and drop entries without an id or title.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::store::{write_file, CatalogStore};
use crate::types::Series;

pub const PRIMARY_KEY: &str = "guesseries-series-v2";
pub const BACKUP_KEY: &str = "guesseries-series-backup";

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Raw value under a key, `None` if never written
    pub fn get(&self, key: &str) -> Result<Option<String>, CatalogError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::io(path, e)),
        }
    }

    fn read_key(&self, key: &str) -> Option<Catalog> {
        let raw = match self.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "local cache unreadable");
                return None;
            }
        };
        match Catalog::from_json_lenient(&raw) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                tracing::warn!(key, error = %e, "local cache entry is not valid json");
                None
            }
        }
    }

    /// Write the catalog under both keys
    pub fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let json = serde_json::to_string(catalog.series())?;
        write_file(&self.key_path(PRIMARY_KEY), &json)?;
        write_file(&self.key_path(BACKUP_KEY), &json)?;
        tracing::debug!(series = catalog.len(), "saved catalog to local cache");
        Ok(())
    }
}

impl CatalogStore for LocalCache {
    /// Primary key, else backup key, else an empty catalog
    fn load(&self) -> Result<Catalog, CatalogError> {
        if let Some(catalog) = self.read_key(PRIMARY_KEY) {
            return Ok(catalog);
        }
        if let Some(catalog) = self.read_key(BACKUP_KEY) {
            tracing::info!(series = catalog.len(), "restored catalog from backup key");
            return Ok(catalog);
        }
        Ok(Catalog::default())
    }

    fn save_series(&self, series: Series) -> Result<(), CatalogError> {
        let mut catalog = self.load()?;
        catalog.upsert(series);
        self.save(&catalog)
    }

    fn update_series(&self, id: &str, series: Series) -> Result<(), CatalogError> {
        let mut catalog = self.load()?;
        catalog.replace_at_id(id, series)?;
        self.save(&catalog)
    }

    fn delete_series(&self, id: &str) -> Result<bool, CatalogError> {
        let mut catalog = self.load()?;
        let removed = catalog.remove(id);
        self.save(&catalog)?;
        Ok(removed)
    }

    fn clear(&self) -> Result<(), CatalogError> {
        self.save(&Catalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalizedString;

    fn series(id: &str) -> Series {
        Series {
            id: id.to_string(),
            title: LocalizedString::from("T"),
            year: None,
            poster: String::new(),
            plot: LocalizedString::default(),
            seasons: Vec::new(),
        }
    }

    #[test]
    fn test_empty_cache_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"));
        assert!(cache.load().unwrap().is_empty());
        assert_eq!(cache.get(PRIMARY_KEY).unwrap(), None);
    }

    #[test]
    fn test_save_writes_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        cache.save_series(series("a")).unwrap();
        let primary = cache.get(PRIMARY_KEY).unwrap().unwrap();
        assert_eq!(Some(primary), cache.get(BACKUP_KEY).unwrap());
    }

    #[test]
    fn test_backup_used_when_primary_is_broken() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.save(&Catalog::new(vec![series("a"), series("b")])).unwrap();

        fs::write(dir.path().join(format!("{}.json", PRIMARY_KEY)), "{broken").unwrap();
        assert_eq!(cache.load().unwrap().len(), 2);

        fs::remove_file(dir.path().join(format!("{}.json", PRIMARY_KEY))).unwrap();
        assert_eq!(cache.load().unwrap().len(), 2);
    }

    #[test]
    fn test_load_drops_entries_without_title() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        fs::write(
            dir.path().join(format!("{}.json", PRIMARY_KEY)),
            r#"[{"id":"a","title":"A"},{"id":"b"}]"#,
        )
        .unwrap();

        let catalog = cache.load().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("a").is_some());
    }
}
