//! Walk Gallery
//!
//! A small web application that collects text notes, images, audio
//! recordings and drawings and shows them in a chronological gallery.
//!
//! # Deployments
//!
//! - Local SQLite (the default, `data/gallery.db`)
//! - Managed PostgreSQL (`GALLERY_BACKEND=postgres` plus `DATABASE_URL`)
//! - Either store with media hosted on Cloudinary (`CLOUDINARY_*`)
//!
//! # Cargo Features
//!
//! - `sqlite` - Embedded SQLite store (default)
//! - `postgres` - PostgreSQL store (default)
//! - `observability` - OpenTelemetry span export
//!
//! # Architecture
//!
//! - `gallery_error` - Error types
//! - `gallery_core` - Posts, content and the timestamp clock
//! - `gallery_interface` - `PostRepository` trait
//! - `gallery_storage` - Media encoding and Cloudinary uploads
//! - `gallery_database` - SQLite and PostgreSQL repositories
//! - `gallery_server` - HTTP routes and HTML rendering
//!
//! This crate re-exports everything for convenience and provides settings
//! loading, logging setup and the `walk-gallery` binary.

pub use gallery_core::*;
pub use gallery_database::*;
pub use gallery_error::*;
pub use gallery_interface::*;
pub use gallery_server::*;
pub use gallery_storage::*;

mod observability;
mod settings;

pub use observability::{init_observability, ObservabilityConfig};
pub use settings::{MediaSettings, Settings};
