//! HTTP surface for Walk Gallery.
//!
//! Serves the submission form, the gallery page, a JSON listing and media
//! downloads over axum. The repository and media encoder are created once at
//! startup and shared with every handler through [`AppState`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handlers;
mod render;
mod router;
mod server;
mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use render::{escape_html, render_gallery, render_index, Layout};
pub use router::create_router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;
