//! `list` and `add-text` commands.

use super::OutputFormat;
use walk_gallery::{
    DatabaseError, DatabaseErrorKind, GalleryError, GalleryResult, MediaSource, Post,
    PostContent, Settings, TimestampClock,
};

fn summary(post: &Post) -> String {
    match &post.content {
        PostContent::Text(text) => text.clone(),
        content => match content.payload() {
            Some(payload) => {
                let location = match &payload.source {
                    MediaSource::Url(url) => url.clone(),
                    MediaSource::Inline(data) => format!("inline, {} base64 chars", data.len()),
                };
                match &payload.name {
                    Some(name) => format!("{} ({}, {})", name, payload.mime, location),
                    None => format!("({}, {})", payload.mime, location),
                }
            }
            None => String::new(),
        },
    }
}

/// Print every post, oldest first.
pub async fn list_posts(settings: &Settings, format: OutputFormat) -> GalleryResult<()> {
    let repo = settings.open_repository().await?;
    let posts = repo.list_all().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&posts)
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::Serialization(e.to_string())))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            for post in &posts {
                println!("{}  {:<7}  {}", post.datetime, post.content.label(), summary(post));
            }
            println!("Total: {} posts ({})", posts.len(), repo.backend_name());
        }
    }

    Ok(())
}

/// Insert one text post.
pub async fn add_text(settings: &Settings, text: String) -> GalleryResult<()> {
    let content = PostContent::text(text).map_err(GalleryError::from)?;
    let repo = settings.open_repository().await?;

    let clock = TimestampClock::new();
    if let Some(latest) = repo.latest_timestamp().await? {
        clock.resume_after(&latest);
    }
    let post = Post::new(content, &clock);
    repo.insert(&post).await?;

    println!("Added post {} at {}", post.id, post.datetime);
    Ok(())
}
