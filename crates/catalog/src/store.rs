//! Store module - persistence for the catalog
//!
//! Every operation reads the whole catalog and every mutation rewrites it. The
//! stores do not lock across a read-modify-write; callers that mutate
//! concurrently must serialize their writes (the HTTP service holds one write
//! lock for that). Files are replaced atomically, so a reader never sees a
//! partial catalog.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::types::Series;

/// Catalog persistence with the service's CRUD semantics
pub trait CatalogStore: Send + Sync {
    fn load(&self) -> Result<Catalog, CatalogError>;

    /// Replace the series with the same id, or append it
    fn save_series(&self, series: Series) -> Result<(), CatalogError>;

    /// Replace the series stored under `id` with `series` verbatim.
    ///
    /// Fails with [`CatalogError::SeriesNotFound`] when there is none.
    fn update_series(&self, id: &str, series: Series) -> Result<(), CatalogError>;

    /// Remove a series; removing a missing id is not an error
    fn delete_series(&self, id: &str) -> Result<bool, CatalogError>;

    fn clear(&self) -> Result<(), CatalogError>;
}

/// Catalog kept in a pretty-printed JSON file, plus optional mirror copies
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    mirrors: Vec<PathBuf>,
}

impl JsonFileStore {
    /// Open the store, creating the file (and its directories) holding `[]`
    /// when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        if !path.exists() {
            write_file(&path, "[]")?;
            tracing::info!(path = %path.display(), "created empty catalog file");
        }
        Ok(Self {
            path,
            mirrors: Vec::new(),
        })
    }

    /// Also write every mutation to `path` (the static snapshot)
    pub fn with_mirror(mut self, path: impl Into<PathBuf>) -> Self {
        self.mirrors.push(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mirrors(&self) -> &[PathBuf] {
        &self.mirrors
    }

    fn write(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let json = catalog.to_json_pretty()?;
        write_file(&self.path, &json)?;
        for mirror in &self.mirrors {
            write_file(mirror, &json)?;
        }
        tracing::debug!(
            path = %self.path.display(),
            series = catalog.len(),
            mirrors = self.mirrors.len(),
            "catalog written"
        );
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Catalog) -> Result<T, CatalogError>) -> Result<T, CatalogError> {
        let mut catalog = self.load()?;
        let out = f(&mut catalog)?;
        self.write(&catalog)?;
        Ok(out)
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let json = fs::read_to_string(&self.path).map_err(|e| CatalogError::io(&self.path, e))?;
        Catalog::from_json(&json)
    }

    fn save_series(&self, series: Series) -> Result<(), CatalogError> {
        self.modify(|catalog| {
            catalog.upsert(series);
            Ok(())
        })
    }

    fn update_series(&self, id: &str, series: Series) -> Result<(), CatalogError> {
        self.modify(|catalog| catalog.replace_at_id(id, series))
    }

    fn delete_series(&self, id: &str) -> Result<bool, CatalogError> {
        self.modify(|catalog| Ok(catalog.remove(id)))
    }

    fn clear(&self) -> Result<(), CatalogError> {
        self.write(&Catalog::default())
    }
}

/// Write to a temp file next to `path`, then rename it over `path`
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), CatalogError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| CatalogError::io(parent, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| CatalogError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| CatalogError::io(path, e.error))?;
    Ok(())
}

/// In-memory store with the same semantics as [`JsonFileStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Mutex<Catalog>,
}

impl MemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CatalogStore for MemoryStore {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Ok(self.lock().clone())
    }

    fn save_series(&self, series: Series) -> Result<(), CatalogError> {
        self.lock().upsert(series);
        Ok(())
    }

    fn update_series(&self, id: &str, series: Series) -> Result<(), CatalogError> {
        self.lock().replace_at_id(id, series)
    }

    fn delete_series(&self, id: &str) -> Result<bool, CatalogError> {
        Ok(self.lock().remove(id))
    }

    fn clear(&self) -> Result<(), CatalogError> {
        self.lock().clear();
        Ok(())
    }
}
