//! Catalog service - file-backed HTTP CRUD over the series catalog
//!
//! One JSON file holds the whole catalog. Every request re-reads it and every
//! write rewrites it (plus the static snapshot mirror, when configured).
//! Writes are serialized; the last one wins.
//!
//! # Configuration
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `GUESSERIES_HOST` | `127.0.0.1` | Bind host |
//! | `GUESSERIES_PORT` / `PORT` | `3001` | Bind port |
//! | `GUESSERIES_DATA_FILE` | `data/series.json` | Catalog file |
//! | `GUESSERIES_PUBLIC_FILE` | `public/data/series.json` | Snapshot mirror (empty disables) |
//! | `GUESSERIES_BODY_LIMIT_MB` | `50` | Request body limit |

pub mod config;
pub mod routes;
pub mod server;

pub use guesseries_catalog as catalog;
pub use guesseries_types as types;

pub use config::ServerConfig;
pub use routes::{router, ApiError, AppState};
pub use server::{check_tcp_listen_available, open_store, run_server};
