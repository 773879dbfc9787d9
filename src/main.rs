//! Catalog service (default binary).
//!
//! Serves the series catalog over HTTP, configured from the environment
//! (see [`ServerConfig::from_env`]). Log filtering follows `RUST_LOG`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use guesseries::server::{check_tcp_listen_available, run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    if let Err(e) = check_tcp_listen_available(&config.host, config.port) {
        tracing::error!(host = %config.host, port = config.port, error = %e, "cannot bind catalog service");
        return Err(e.into());
    }

    run_server(config, None).await
}
