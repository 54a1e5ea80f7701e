//! Post payload types.
//!
//! Content is persisted as a JSON document in the shape the gallery has
//! always used, keyed by kind:
//!
//! ```text
//! {"text": "Yay!"}
//! {"image": {"name": "walk.png", "type": "image/png", "data": "<base64>"}}
//! {"audio": {"name": "clip.wav", "type": "audio/wav", "url": "https://..."}}
//! ```

use crate::MediaKind;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gallery_error::{StorageError, StorageErrorKind, ValidationError};
use serde::{Deserialize, Serialize};

/// Where the bytes of a media payload live.
///
/// # Examples
///
/// ```
/// use gallery_core::{MediaSource, Resolved};
///
/// let inline = MediaSource::inline(b"\x89PNG");
/// assert!(matches!(inline.resolve().unwrap(), Resolved::Bytes(b) if b == b"\x89PNG"));
///
/// let remote = MediaSource::Url("https://cdn.example.com/a.png".to_string());
/// assert!(remote.is_url());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// Base64-encoded bytes embedded in the row
    #[serde(rename = "data")]
    Inline(String),
    /// URL on the remote media store
    #[serde(rename = "url")]
    Url(String),
}

/// A media source resolved for display or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// Decoded inline bytes
    Bytes(Vec<u8>),
    /// Remote location serving the bytes
    Url(&'a str),
}

impl MediaSource {
    /// Embed raw bytes as standard base64.
    pub fn inline(bytes: &[u8]) -> Self {
        MediaSource::Inline(STANDARD.encode(bytes))
    }

    /// Whether the bytes are hosted remotely.
    pub fn is_url(&self) -> bool {
        matches!(self, MediaSource::Url(_))
    }

    /// Decode inline data, or hand back the remote URL.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if inline data is not valid base64.
    pub fn resolve(&self) -> Result<Resolved<'_>, StorageError> {
        match self {
            MediaSource::Inline(data) => STANDARD
                .decode(data.trim())
                .map(Resolved::Bytes)
                .map_err(|e| StorageError::new(StorageErrorKind::Decode(e.to_string()))),
            MediaSource::Url(url) => Ok(Resolved::Url(url)),
        }
    }
}

/// Binary media attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaPayload {
    /// Original filename, when the client sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MIME type of the bytes
    #[serde(rename = "type")]
    pub mime: String,
    /// Inline data or remote URL
    #[serde(flatten)]
    pub source: MediaSource,
}

impl MediaPayload {
    /// Value for an `src` attribute: a `data:` URI for inline bytes, the URL otherwise.
    pub fn src(&self) -> String {
        match &self.source {
            MediaSource::Inline(data) => format!("data:{};base64,{}", self.mime, data),
            MediaSource::Url(url) => url.clone(),
        }
    }
}

/// The single payload of a post.
///
/// # Examples
///
/// ```
/// use gallery_core::PostContent;
///
/// let content = PostContent::text("Yay!").unwrap();
/// assert_eq!(content.to_stored().unwrap(), r#"{"text":"Yay!"}"#);
/// assert_eq!(PostContent::from_stored(r#"{"text":"Yay!"}"#).unwrap(), content);
///
/// assert!(PostContent::text("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostContent {
    /// Plain text note
    Text(String),
    /// Uploaded image
    Image(MediaPayload),
    /// Recorded audio
    Audio(MediaPayload),
    /// Canvas drawing
    Drawing(MediaPayload),
}

/// Keys checked, in order, when a stored document carries several kinds.
const STORED_KEYS: [&str; 4] = ["text", "image", "audio", "drawing"];

impl PostContent {
    /// Text content; rejects blank input.
    pub fn text(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::new("Text content must not be empty"));
        }
        Ok(PostContent::Text(text))
    }

    /// Media content of the given kind.
    pub fn media(kind: MediaKind, payload: MediaPayload) -> Self {
        match kind {
            MediaKind::Image => PostContent::Image(payload),
            MediaKind::Audio => PostContent::Audio(payload),
            MediaKind::Drawing => PostContent::Drawing(payload),
        }
    }

    /// Media kind, or `None` for text.
    pub fn kind(&self) -> Option<MediaKind> {
        match self {
            PostContent::Text(_) => None,
            PostContent::Image(_) => Some(MediaKind::Image),
            PostContent::Audio(_) => Some(MediaKind::Audio),
            PostContent::Drawing(_) => Some(MediaKind::Drawing),
        }
    }

    /// Short label used in logs and listings.
    pub fn label(&self) -> &'static str {
        self.kind().map_or("text", |kind| kind.as_str())
    }

    /// The media payload, if this is not a text post.
    pub fn payload(&self) -> Option<&MediaPayload> {
        match self {
            PostContent::Text(_) => None,
            PostContent::Image(p) | PostContent::Audio(p) | PostContent::Drawing(p) => Some(p),
        }
    }

    /// Serialize for the `content` column.
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a `content` column value.
    ///
    /// Values that are not a JSON object (including plain strings) are read as
    /// text. Objects holding several kinds resolve to the first of text, image,
    /// audio, drawing.
    ///
    /// # Errors
    ///
    /// Returns an error for objects that carry no known kind or whose media
    /// entry is malformed.
    pub fn from_stored(raw: &str) -> Result<Self, serde_json::Error> {
        let value = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => value,
            Err(_) => return Ok(PostContent::Text(raw.to_string())),
        };

        let mut map = match value {
            serde_json::Value::Object(map) => map,
            serde_json::Value::String(text) => return Ok(PostContent::Text(text)),
            _ => return Ok(PostContent::Text(raw.to_string())),
        };

        if map.len() > 1 {
            tracing::debug!(keys = map.len(), "Stored content has several kinds, keeping the first");
        }

        for key in STORED_KEYS {
            let Some(entry) = map.remove(key) else {
                continue;
            };
            if entry.is_null() || entry.as_str().is_some_and(str::is_empty) {
                continue;
            }
            let mut single = serde_json::Map::new();
            single.insert(key.to_string(), entry);
            return serde_json::from_value(serde_json::Value::Object(single));
        }

        Err(serde::de::Error::custom("content has no text, image, audio or drawing entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_payload_uses_legacy_field_names() {
        let content = PostContent::Image(MediaPayload {
            name: Some("walk.png".to_string()),
            mime: "image/png".to_string(),
            source: MediaSource::Inline("aGk=".to_string()),
        });
        let stored = content.to_stored().unwrap();
        let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(value["image"]["type"], "image/png");
        assert_eq!(value["image"]["data"], "aGk=");
        assert_eq!(value["image"]["name"], "walk.png");
    }

    #[test]
    fn url_payload_round_trips() {
        let content = PostContent::Audio(MediaPayload {
            name: None,
            mime: "audio/wav".to_string(),
            source: MediaSource::Url("https://res.cloudinary.com/demo/video/upload/a.wav".into()),
        });
        let stored = content.to_stored().unwrap();
        assert!(stored.contains(r#""url":"https://res.cloudinary.com"#));
        assert_eq!(PostContent::from_stored(&stored).unwrap(), content);
    }

    #[test]
    fn plain_string_column_is_text() {
        assert_eq!(
            PostContent::from_stored("hello walk").unwrap(),
            PostContent::Text("hello walk".to_string())
        );
        assert_eq!(
            PostContent::from_stored("42").unwrap(),
            PostContent::Text("42".to_string())
        );
    }

    #[test]
    fn legacy_multi_kind_row_prefers_text() {
        let raw = r#"{"image":{"name":"a.png","type":"image/png","data":"aGk="},"text":"hi"}"#;
        assert_eq!(
            PostContent::from_stored(raw).unwrap(),
            PostContent::Text("hi".to_string())
        );
    }

    #[test]
    fn legacy_row_without_text_falls_through_to_image() {
        let raw = r#"{"text":"","image":{"name":"a.png","type":"image/png","data":"aGk="}}"#;
        let content = PostContent::from_stored(raw).unwrap();
        assert_eq!(content.kind(), Some(MediaKind::Image));
    }

    #[test]
    fn unknown_object_is_an_error() {
        assert!(PostContent::from_stored(r#"{"video":{}}"#).is_err());
        assert!(PostContent::from_stored(r#"{"image":{"type":"image/png"}}"#).is_err());
    }

    #[test]
    fn inline_src_is_data_uri() {
        let payload = MediaPayload {
            name: None,
            mime: "image/jpeg".to_string(),
            source: MediaSource::inline(b"abc"),
        };
        assert_eq!(payload.src(), "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn invalid_base64_fails_to_resolve() {
        let source = MediaSource::Inline("not base64!!".to_string());
        assert!(source.resolve().is_err());
    }
}
