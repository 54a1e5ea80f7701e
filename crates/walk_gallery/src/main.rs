//! Walk Gallery CLI binary.
//!
//! This binary provides command-line access to the gallery:
//! - Serve the web app
//! - Export the gallery as a standalone HTML page
//! - List and add posts
//! - Copy posts between the SQLite and PostgreSQL stores

use clap::Parser;
use std::process::ExitCode;
use walk_gallery::{init_observability, GalleryResult, ObservabilityConfig, Settings};

mod cli;

use cli::{Cli, Commands, add_text, copy_between, export_gallery, list_posts, run_server};

async fn run(cli: Cli) -> GalleryResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => run_server(&settings, bind).await,
        Commands::Export { output } => export_gallery(&settings, &output).await,
        Commands::List { format } => list_posts(&settings, format).await,
        Commands::AddText { text } => add_text(&settings, text).await,
        Commands::Copy { from, to } => copy_between(&settings, from, to).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    let observability = ObservabilityConfig::new("walk-gallery")
        .with_log_level(log_level)
        .with_json_logs(cli.json_logs);
    if let Err(e) = init_observability(&observability) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
