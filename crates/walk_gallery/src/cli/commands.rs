//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use walk_gallery::Backend;

/// Walk Gallery - a chronological gallery of text, images, audio and drawings
#[derive(Parser, Debug)]
#[command(name = "walk-gallery")]
#[command(about = "A chronological gallery of text, images, audio and drawings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to ./walk_gallery.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides settings)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Write the gallery to a standalone HTML file
    Export {
        /// Output file
        #[arg(short, long, default_value = "walk_gallery.html")]
        output: PathBuf,
    },

    /// Print every post, oldest first
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Add a text post
    AddText {
        /// Text of the post
        text: String,
    },

    /// Copy posts from one backend to another
    Copy {
        /// Source backend (sqlite or postgres)
        #[arg(long)]
        from: Backend,

        /// Target backend (sqlite or postgres)
        #[arg(long)]
        to: Backend,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
