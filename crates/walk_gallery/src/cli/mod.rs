//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! walk-gallery binary.

mod commands;
mod copy;
mod export;
mod posts;
mod serve;

pub use commands::{Cli, Commands, OutputFormat};
pub use copy::copy_between;
pub use export::export_gallery;
pub use posts::{add_text, list_posts};
pub use serve::run_server;
