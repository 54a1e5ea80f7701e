//! Media storage error types.

/// Kinds of media storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Remote store credentials are missing or incomplete
    #[display("Remote media store not configured: {}", _0)]
    NotConfigured(String),
    /// Upload was rejected or failed mid-flight
    #[display("Upload failed: {}", _0)]
    Upload(String),
    /// Remote store answered with a body we could not interpret
    #[display("Invalid response from media store: {}", _0)]
    InvalidResponse(String),
    /// Stored inline data could not be decoded
    #[display("Failed to decode media: {}", _0)]
    Decode(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use gallery_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Upload("timed out".to_string()));
/// assert!(format!("{}", err).contains("Upload failed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
