//! Remote media store trait definition.

use gallery_core::MediaKind;
use gallery_error::GalleryResult;

/// Metadata about media being uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    /// Kind of media (image, audio, drawing)
    pub kind: MediaKind,
    /// MIME type (e.g., "image/png", "audio/wav")
    pub mime: String,
    /// Original filename (if available)
    pub filename: Option<String>,
}

/// Reference to media hosted on a remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaReference {
    /// Public URL serving the bytes
    pub url: String,
    /// Store-specific identifier, if the store returned one
    pub public_id: Option<String>,
    /// Size of the uploaded media in bytes
    pub size_bytes: i64,
    /// Store backend name (e.g., "cloudinary")
    pub storage_backend: &'static str,
}

/// Trait for remote media stores that host bytes behind a URL.
///
/// Uploads are awaited within the request that submits the media.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload media and return where it can be fetched.
    ///
    /// # Arguments
    ///
    /// * `data` - The binary media data to upload
    /// * `metadata` - Kind, MIME type and filename of the media
    async fn upload(&self, data: &[u8], metadata: &MediaMetadata)
    -> GalleryResult<MediaReference>;

    /// Store backend name (e.g., "cloudinary").
    fn name(&self) -> &'static str;
}
