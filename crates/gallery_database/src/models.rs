//! Row types for the `posts` table.

use crate::schema::posts;
use crate::DatabaseResult;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use gallery_core::{Post, StoredPost};

/// A row as read from `posts`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = posts)]
pub struct PostRow {
    /// Primary key
    pub id: String,
    /// Sortable creation time
    pub timestamp: String,
    /// Display creation time
    pub datetime: String,
    /// JSON-encoded [`gallery_core::PostContent`]
    pub content: String,
    /// Database-assigned insertion time
    pub created_at: Option<NaiveDateTime>,
}

impl PostRow {
    /// The row with its content left encoded.
    pub fn into_stored(self) -> StoredPost {
        StoredPost {
            id: self.id,
            timestamp: self.timestamp,
            datetime: self.datetime,
            content: self.content,
            created_at: self.created_at,
        }
    }

    /// Decode into a domain post.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `content` is corrupt.
    pub fn into_post(self) -> DatabaseResult<Post> {
        Ok(self.into_stored().decode()?)
    }
}

/// A row to insert; `created_at` is left to the column default.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPostRow {
    /// Primary key
    pub id: String,
    /// Sortable creation time
    pub timestamp: String,
    /// Display creation time
    pub datetime: String,
    /// JSON-encoded [`gallery_core::PostContent`]
    pub content: String,
}

impl NewPostRow {
    /// Encode a domain post for insertion.
    pub fn from_post(post: &Post) -> DatabaseResult<Self> {
        Ok(Self::from_stored(&StoredPost::from_post(post)?))
    }

    /// Insert a stored row as is.
    pub fn from_stored(post: &StoredPost) -> Self {
        Self {
            id: post.id.clone(),
            timestamp: post.timestamp.clone(),
            datetime: post.datetime.clone(),
            content: post.content.clone(),
        }
    }
}

/// Decode rows, skipping any whose content cannot be read.
pub fn rows_to_posts(rows: Vec<PostRow>) -> Vec<Post> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match row.into_post() {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Skipping post with corrupt content");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, content: &str) -> PostRow {
        PostRow {
            id: id.to_string(),
            timestamp: "20250314_101500".to_string(),
            datetime: "2025-03-14 10:15:00".to_string(),
            content: content.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn corrupt_rows_are_skipped() {
        let posts = rows_to_posts(vec![
            row("a", r#"{"text":"first"}"#),
            row("b", r#"{"image":{"type":"image/png"}}"#),
            row("c", "plain"),
        ]);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn stored_rows_insert_unchanged() {
        let raw = r#"{"image":{"type":"image/png"}}"#;
        let new = NewPostRow::from_stored(&row("b", raw).into_stored());
        assert_eq!(new.content, raw);
        assert_eq!(new.id, "b");
    }
}
