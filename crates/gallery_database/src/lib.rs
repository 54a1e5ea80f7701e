//! SQLite and PostgreSQL storage for Walk Gallery.
//!
//! Both backends share one diesel schema:
//!
//! ```sql
//! posts(id TEXT PRIMARY KEY, timestamp TEXT NOT NULL, datetime TEXT NOT NULL,
//!       content TEXT NOT NULL, created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)
//! CREATE INDEX idx_posts_timestamp ON posts (timestamp)
//! ```
//!
//! # Features
//!
//! - `sqlite` - embedded single-file store (default)
//! - `postgres` - networked store with pooled SSL connections (default)
//!
//! # Example
//!
//! ```rust,no_run
//! use gallery_core::{Post, PostContent, TimestampClock};
//! use gallery_database::{connect, DatabaseConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = connect(&DatabaseConfig::sqlite("data/gallery.db")).await?;
//! let clock = TimestampClock::new();
//! repo.insert(&Post::new(PostContent::text("Yay!")?, &clock)).await?;
//! let posts = repo.list_all().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connect;
mod legacy;
mod models;
mod pool;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod schema;

pub use config::{Backend, DatabaseConfig};
pub use connect::{connect, copy_posts, CopyReport};
pub use models::{rows_to_posts, NewPostRow, PostRow};
#[cfg(feature = "postgres")]
pub use postgres::{normalize_postgres_url, PostgresPostRepository, POSTGRES_MIGRATIONS};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqlitePostRepository, SQLITE_MIGRATIONS};

use gallery_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
