use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Catalog file every request reads and every write rewrites
    pub data_file: PathBuf,
    /// Static snapshot rewritten alongside the data file (`None` disables it)
    pub public_file: Option<PathBuf>,
    pub body_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            data_file: PathBuf::from("data/series.json"),
            public_file: Some(PathBuf::from("public/data/series.json")),
            body_limit_mb: 50,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup, falling back to defaults for missing or
    /// unparsable values
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = var("GUESSERIES_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        let port = var("GUESSERIES_PORT")
            .or_else(|| var("PORT"))
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let data_file = var("GUESSERIES_DATA_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        // Set but empty turns the mirror off.
        let public_file = match var("GUESSERIES_PUBLIC_FILE") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(PathBuf::from(s.trim())),
            None => defaults.public_file,
        };

        let body_limit_mb = var("GUESSERIES_BODY_LIMIT_MB")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&mb: &usize| mb > 0)
            .unwrap_or(defaults.body_limit_mb);

        Self {
            host,
            port,
            data_file,
            public_file,
            body_limit_mb,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }
}
