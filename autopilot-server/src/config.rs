//! Server configuration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Which [`DataStore`](crate::store::DataStore) implementation to run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL (privileged credential in the URL)
    Postgres { database_url: String },
    /// In-process tables, lost on exit
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    pub store_backend: StoreBackend,
    /// Public key dashboard callers present in the `apikey` header
    pub anon_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let store_backend = match var("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres {
                database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let http_port = match var("HTTP_PORT") {
            None => 8080,
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid {
                name: "HTTP_PORT",
                value: p,
            })?,
        };

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            http_port,
            store_backend,
            anon_key: var("ANON_KEY").ok_or(ConfigError::Missing("ANON_KEY"))?,
        })
    }
}
