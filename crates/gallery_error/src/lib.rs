//! Error types for Walk Gallery.
//!
//! This crate provides the error types shared by every crate in the workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use gallery_error::{GalleryResult, ConfigError};
//!
//! fn database_url() -> GalleryResult<String> {
//!     Err(ConfigError::new("DATABASE_URL is not set"))?
//! }
//!
//! assert!(database_url().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod http;
mod server;
mod storage;
mod validation;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{GalleryError, GalleryErrorKind, GalleryResult};
pub use http::HttpError;
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
