//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, HttpError, ServerError, StorageError, ValidationError,
};

/// Every error the gallery can produce.
///
/// # Examples
///
/// ```
/// use gallery_error::{GalleryError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: GalleryError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GalleryErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Remote media store error
    #[from(StorageError)]
    Storage(StorageError),
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// Rejected user input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// HTTP server error
    #[from(ServerError)]
    Server(ServerError),
}

/// Gallery error with kind discrimination.
///
/// # Examples
///
/// ```
/// use gallery_error::{GalleryError, GalleryErrorKind, GalleryResult, ConfigError};
///
/// fn might_fail() -> GalleryResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), GalleryErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Walk Gallery Error: {}", _0)]
pub struct GalleryError(Box<GalleryErrorKind>);

impl GalleryError {
    /// Create a new error from a kind.
    pub fn new(kind: GalleryErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GalleryErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GalleryErrorKind
impl<T> From<T> for GalleryError
where
    T: Into<GalleryErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for gallery operations.
pub type GalleryResult<T> = std::result::Result<T, GalleryError>;
