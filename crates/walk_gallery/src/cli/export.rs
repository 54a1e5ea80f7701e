//! `export` command.

use std::path::Path;
use walk_gallery::{
    render_gallery, GalleryResult, Layout, ServerError, ServerErrorKind, Settings,
};

/// Render every post into a standalone HTML file.
pub async fn export_gallery(settings: &Settings, output: &Path) -> GalleryResult<()> {
    let repo = settings.open_repository().await?;
    let posts = repo.list_all().await?;
    let html = render_gallery(&posts, Layout::Standalone);

    tokio::fs::write(output, html).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Write(format!("{}: {}", output.display(), e)))
    })?;

    tracing::info!(posts = posts.len(), output = %output.display(), "Exported gallery");
    println!("Exported {} posts to {}", posts.len(), output.display());
    Ok(())
}
