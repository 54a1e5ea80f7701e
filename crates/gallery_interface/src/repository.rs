//! Post persistence trait.

use async_trait::async_trait;
use gallery_core::{Post, StoredPost};
use gallery_error::GalleryResult;

/// Append-only store of gallery posts.
///
/// Implementations own the `posts` table exclusively. Posts are never updated
/// or deleted.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Append a post.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate id (`DatabaseErrorKind::UniqueViolation`) or when
    /// the database cannot be reached.
    async fn insert(&self, post: &Post) -> GalleryResult<()>;

    /// Every post, ordered by `timestamp` ascending (ties broken by `id`).
    async fn list_all(&self) -> GalleryResult<Vec<Post>>;

    /// Every row as stored, in `list_all` order.
    ///
    /// Content is not decoded, so rows `list_all` would skip or reduce are
    /// returned intact.
    async fn list_stored(&self) -> GalleryResult<Vec<StoredPost>>;

    /// Append a stored row unchanged; `created_at` is assigned by the store.
    ///
    /// # Errors
    ///
    /// Same as [`PostRepository::insert`].
    async fn insert_stored(&self, post: &StoredPost) -> GalleryResult<()>;

    /// Largest `timestamp` in the store, if any.
    async fn latest_timestamp(&self) -> GalleryResult<Option<String>>;

    /// Number of stored posts.
    async fn count(&self) -> GalleryResult<i64>;

    /// Backend name, e.g. "sqlite" or "postgres".
    fn backend_name(&self) -> &'static str;
}
