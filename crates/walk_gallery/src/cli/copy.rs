//! `copy` command.

use walk_gallery::{connect, copy_posts, Backend, ConfigError, GalleryResult, Settings};

/// Copy every post from one backend into the other.
///
/// Both backends use the connection settings already loaded; only the
/// backend selection differs.
pub async fn copy_between(settings: &Settings, from: Backend, to: Backend) -> GalleryResult<()> {
    if from == to {
        return Err(ConfigError::new("--from and --to must name different backends").into());
    }

    let source = connect(&settings.database.clone().with_backend(from)).await?;
    let target = connect(&settings.database.clone().with_backend(to)).await?;
    let report = copy_posts(source.as_ref(), target.as_ref()).await?;

    println!(
        "Copied {} posts from {} to {} ({} already present)",
        report.copied, from, to, report.skipped
    );
    Ok(())
}
