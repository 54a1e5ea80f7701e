//! Media encoding policy.

use crate::{MediaMetadata, MediaStore};
use gallery_core::{MediaKind, MediaPayload, MediaSource, PostContent};
use gallery_error::{GalleryResult, ValidationError};
use std::sync::Arc;

/// Turns uploaded bytes into post content.
///
/// With a remote store the bytes are uploaded and the URL is kept; without
/// one, or when the upload fails, the bytes are embedded as base64.
#[derive(Clone)]
pub struct MediaEncoder {
    remote: Option<Arc<dyn MediaStore>>,
}

impl MediaEncoder {
    /// Encoder that always embeds.
    pub fn inline_only() -> Self {
        Self { remote: None }
    }

    /// Encoder that uploads to `store` first.
    pub fn with_remote(store: Arc<dyn MediaStore>) -> Self {
        Self {
            remote: Some(store),
        }
    }

    /// Encoder from an optional store.
    pub fn new(remote: Option<Arc<dyn MediaStore>>) -> Self {
        Self { remote }
    }

    /// Whether a remote store is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Name of the configured remote store, if any.
    pub fn remote_name(&self) -> Option<&'static str> {
        self.remote.as_ref().map(|store| store.name())
    }

    /// Encode `data` as content of the given kind.
    ///
    /// A missing `mime`, or one that does not belong to the kind (`image/*`
    /// for pictures, `audio/*` for audio), falls back to the kind's default.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for empty data. Upload failures are not
    /// errors; they degrade to inline storage.
    #[tracing::instrument(skip(self, data, filename, mime), fields(kind = %kind, size = data.len()))]
    pub async fn encode(
        &self,
        kind: MediaKind,
        filename: Option<String>,
        mime: Option<String>,
        data: &[u8],
    ) -> GalleryResult<PostContent> {
        if data.is_empty() {
            return Err(ValidationError::new(format!("Uploaded {} is empty", kind)).into());
        }

        let mime = kind.sanitize_mime(mime.as_deref());
        let filename = filename.filter(|f| !f.trim().is_empty());

        let source = match &self.remote {
            Some(store) => {
                let metadata = MediaMetadata {
                    kind,
                    mime: mime.clone(),
                    filename: filename.clone(),
                };
                match store.upload(data, &metadata).await {
                    Ok(reference) => {
                        tracing::debug!(url = %reference.url, store = store.name(), "Media stored remotely");
                        MediaSource::Url(reference.url)
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            store = store.name(),
                            "Remote upload failed, embedding media inline"
                        );
                        MediaSource::inline(data)
                    }
                }
            }
            None => MediaSource::inline(data),
        };

        Ok(PostContent::media(
            kind,
            MediaPayload {
                name: filename,
                mime,
                source,
            },
        ))
    }
}

impl std::fmt::Debug for MediaEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaEncoder")
            .field("remote", &self.remote_name())
            .finish()
    }
}
