//! Catalog module - series/season/episode records and their persistence
//!
//! The catalog is the admin-curated list of [`Series`](types::Series). This
//! crate owns everything that touches it outside the puzzle itself:
//!
//! - [`catalog`]: the in-memory catalog and its edit operations
//! - [`validate`]: per-season playability checks
//! - [`store`]: the [`CatalogStore`] trait, the JSON file store and an in-memory store
//! - [`local`]: the client-side offline cache (primary + backup key)
//! - [`client`]: HTTP client for the catalog service with offline fallbacks
//!
//! The puzzle only ever receives episodes through
//! [`Catalog::episodes_for_season`], which refuses seasons whose air orders are
//! not exactly `1..=N`.
//!
//! # Example
//!
//! ```
//! use guesseries_catalog::Catalog;
//!
//! let json = r#"[{"id":"tt1","title":"Show","seasons":[
//!     {"seasonNumber":1,"episodes":[
//!         {"id":"tt1-S1E2","title":"B","episode":2,"season":1},
//!         {"id":"tt1-S1E1","title":"A","episode":1,"season":1}]}]}]"#;
//!
//! let catalog = Catalog::from_json(json).unwrap();
//! let pool = catalog.episodes_for_season("tt1", 1).unwrap();
//! assert_eq!(pool.len(), 2);
//! assert!(catalog.episodes_for_season("tt1", 2).is_err());
//! ```

pub mod catalog;
pub mod client;
pub mod error;
pub mod local;
pub mod store;
pub mod validate;

pub use guesseries_types as types;

pub use catalog::Catalog;
pub use client::{CatalogClient, CatalogSource, Sourced, DEFAULT_API_BASE_URL};
pub use error::CatalogError;
pub use local::{LocalCache, BACKUP_KEY, PRIMARY_KEY};
pub use store::{CatalogStore, JsonFileStore, MemoryStore};
pub use validate::{audit, season_issues, validate_season, SeasonIssue, SeasonReport};
