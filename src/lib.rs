//! Guesseries (workspace facade crate).
//!
//! Re-exports the member crates under one name: `guesseries::{types, core, catalog, server}`.
//! The implementation lives in dedicated crates under `crates/`.

pub use guesseries_catalog as catalog;
pub use guesseries_core as core;
pub use guesseries_server as server;
pub use guesseries_types as types;
