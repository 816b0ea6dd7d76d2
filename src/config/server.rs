use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Signing secret used when `JWT_SECRET` is unset. Only honoured by debug builds.
pub const DEV_JWT_SECRET: &str = "dev_secret";

const DEFAULT_DATABASE_URL: &str = "./data/spendwise.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite location: a plain path, `sqlite://path`, `sqlite:path` or `:memory:`.
    pub database_url: String,
    pub jwt_secret: Option<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        database_path(&self.database_url)
    }

    /// Resolves the token signing secret.
    ///
    /// An unset or blank secret falls back to [`DEV_JWT_SECRET`] in debug
    /// builds and is a configuration error in release builds.
    pub fn signing_secret(&self) -> Result<String> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret.to_string()),
            _ if cfg!(debug_assertions) => {
                tracing::warn!(
                    "JWT_SECRET is not set; signing tokens with the insecure development secret"
                );
                Ok(DEV_JWT_SECRET.to_string())
            }
            _ => Err(Error::Config(
                "JWT_SECRET must be set for release builds".to_string(),
            )),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: None,
        }
    }
}

/// Strips an optional `sqlite:` scheme from a database URL.
#[must_use]
pub fn database_path(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}
