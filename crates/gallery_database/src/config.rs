//! Database backend selection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Physical store behind the posts table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Backend {
    /// Embedded single-file SQLite database
    #[default]
    #[display("sqlite")]
    #[strum(serialize = "sqlite")]
    Sqlite,
    /// Networked PostgreSQL database
    #[display("postgres")]
    #[strum(serialize = "postgres", serialize = "postgresql")]
    Postgres,
}

/// Connection settings for both backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Which backend to open
    pub backend: Backend,
    /// SQLite database file (`:memory:` for a private in-memory database)
    pub sqlite_path: PathBuf,
    /// PostgreSQL connection string (`DATABASE_URL`)
    pub url: Option<String>,
    /// Maximum pooled connections
    pub pool_size: u32,
    /// Seconds to wait for a connection before failing
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            sqlite_path: PathBuf::from("data/gallery.db"),
            url: None,
            pool_size: 8,
            connect_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    /// SQLite configuration for the given file.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Sqlite,
            sqlite_path: path.into(),
            ..Self::default()
        }
    }

    /// PostgreSQL configuration for the given connection string.
    pub fn postgres(url: impl Into<String>) -> Self {
        Self {
            backend: Backend::Postgres,
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Select a different backend, keeping the other settings.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set the pool size.
    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    /// Connection timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}
