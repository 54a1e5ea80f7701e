//! Media kind enumeration.

/// Kind of binary media a post can carry.
///
/// The lowercase name is the key used in stored content and form fields.
///
/// # Examples
///
/// ```
/// use gallery_core::MediaKind;
///
/// assert_eq!("drawing".parse::<MediaKind>().unwrap(), MediaKind::Drawing);
/// assert_eq!(MediaKind::Audio.as_str(), "audio");
/// assert!("video".parse::<MediaKind>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
    derive_more::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    /// Uploaded photo (PNG, JPEG)
    #[display("image")]
    Image,
    /// Recorded sound clip
    #[display("audio")]
    Audio,
    /// Freehand drawing exported from the canvas
    #[display("drawing")]
    Drawing,
}

impl MediaKind {
    /// Key used for this kind in stored content and form fields.
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// MIME type assumed when the client does not send one.
    pub fn default_mime(&self) -> &'static str {
        match self {
            MediaKind::Image | MediaKind::Drawing => "image/png",
            MediaKind::Audio => "audio/wav",
        }
    }

    /// Whether the renderer shows this kind as a picture.
    pub fn is_visual(&self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Drawing)
    }

    /// Whether `mime` may be stored and served for this kind.
    ///
    /// Pictures take `image/*`, audio takes `audio/*`. SVG is refused since
    /// it can carry script.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let Some((top, sub)) = essence.split_once('/') else {
            return false;
        };
        if sub.is_empty() || sub.contains(char::is_whitespace) {
            return false;
        }
        match self {
            MediaKind::Image | MediaKind::Drawing => top == "image" && !sub.starts_with("svg"),
            MediaKind::Audio => top == "audio",
        }
    }

    /// `mime` if this kind accepts it, the kind's default otherwise.
    pub fn sanitize_mime(&self, mime: Option<&str>) -> String {
        match mime.map(str::trim) {
            Some(mime) if self.accepts_mime(mime) => mime.to_string(),
            Some(mime) if !mime.is_empty() => {
                tracing::warn!(kind = %self, mime = %mime, "Replacing MIME type that does not match media kind");
                self.default_mime().to_string()
            }
            _ => self.default_mime().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip_through_strum() {
        for kind in MediaKind::iter() {
            assert_eq!(kind.as_str().parse::<MediaKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn mime_must_match_kind() {
        assert!(MediaKind::Image.accepts_mime("image/jpeg"));
        assert!(MediaKind::Drawing.accepts_mime("IMAGE/PNG"));
        assert!(MediaKind::Audio.accepts_mime("audio/webm; codecs=opus"));
        assert!(!MediaKind::Image.accepts_mime("text/html"));
        assert!(!MediaKind::Image.accepts_mime("image/svg+xml"));
        assert!(!MediaKind::Audio.accepts_mime("image/png"));
        assert!(!MediaKind::Image.accepts_mime("image/"));
        assert!(!MediaKind::Image.accepts_mime("image"));
    }

    #[test]
    fn mismatched_mime_falls_back_to_default() {
        assert_eq!(MediaKind::Image.sanitize_mime(Some("text/html")), "image/png");
        assert_eq!(MediaKind::Audio.sanitize_mime(Some(" audio/ogg ")), "audio/ogg");
        assert_eq!(MediaKind::Audio.sanitize_mime(None), "audio/wav");
        assert_eq!(MediaKind::Drawing.sanitize_mime(Some("")), "image/png");
    }
}
