//! Catalog service runner
//!
//! Binds the listener, wires the file store into the router and serves until
//! Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::catalog::JsonFileStore;
use crate::config::ServerConfig;
use crate::routes::{router, AppState};

/// Check whether `host:port` can be bound right now
pub fn check_tcp_listen_available(host: &str, port: u16) -> std::io::Result<()> {
    std::net::TcpListener::bind((host, port)).map(drop)
}

/// Build the file store described by `config`
pub fn open_store(config: &ServerConfig) -> anyhow::Result<JsonFileStore> {
    let mut store = JsonFileStore::open(&config.data_file)?;
    if let Some(public_file) = &config.public_file {
        store = store.with_mirror(public_file);
    }
    Ok(store)
}

/// Run the catalog service.
///
/// `ready_tx` receives the bound address once the listener is up, which lets
/// callers bind port 0 and learn the real port.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    let state = AppState::new(Arc::new(store));
    let app = router(state, config.body_limit_bytes());

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    tracing::info!(
        addr = %bound,
        data_file = %config.data_file.display(),
        mirror = ?config.public_file,
        "catalog service listening"
    );
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("catalog service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
