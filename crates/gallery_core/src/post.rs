//! The gallery post entity.

use crate::{PostContent, TimestampClock};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One gallery entry.
///
/// Posts are created once and never updated or deleted.
///
/// # Examples
///
/// ```
/// use gallery_core::{Post, PostContent, TimestampClock};
///
/// let clock = TimestampClock::new();
/// let post = Post::new(PostContent::text("Yay!").unwrap(), &clock);
/// assert_eq!(post.id.len(), 36);
/// assert!(post.created_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// UUID assigned at creation
    pub id: String,
    /// Sortable creation time
    pub timestamp: String,
    /// Display creation time
    pub datetime: String,
    /// Payload
    pub content: PostContent,
    /// Insertion time assigned by the database; `None` before insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Post {
    /// Build a new post with a fresh id and the next clock stamp.
    pub fn new(content: PostContent, clock: &TimestampClock) -> Self {
        let stamp = clock.stamp();
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: stamp.timestamp,
            datetime: stamp.datetime,
            content,
            created_at: None,
        }
    }
}

/// A post as persisted, with the `content` column left undecoded.
///
/// Moving stored rows between databases goes through this type so that
/// documents holding more than one kind, or content this version cannot
/// decode, are carried over byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPost {
    /// Primary key
    pub id: String,
    /// Sortable creation time
    pub timestamp: String,
    /// Display creation time
    pub datetime: String,
    /// Raw `content` column
    pub content: String,
    /// Insertion time assigned by the database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl StoredPost {
    /// Encode a post for storage.
    pub fn from_post(post: &Post) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: post.id.clone(),
            timestamp: post.timestamp.clone(),
            datetime: post.datetime.clone(),
            content: post.content.to_stored()?,
            created_at: post.created_at,
        })
    }

    /// Decode the content column.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is a JSON object with no readable kind.
    pub fn decode(self) -> Result<Post, serde_json::Error> {
        let content = PostContent::from_stored(&self.content)?;
        Ok(Post {
            id: self.id,
            timestamp: self.timestamp,
            datetime: self.datetime,
            content,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_form_keeps_every_kind_of_a_legacy_row() {
        let raw = r#"{"text": "hi", "image": {"name": "a.png", "type": "image/png", "data": "aGk="}}"#;
        let stored = StoredPost {
            id: "legacy".to_string(),
            timestamp: "20240101_120000".to_string(),
            datetime: "2024-01-01 12:00:00".to_string(),
            content: raw.to_string(),
            created_at: None,
        };

        let post = stored.clone().decode().unwrap();
        assert_eq!(post.content, PostContent::Text("hi".to_string()));
        assert_eq!(stored.content, raw);
    }
}
