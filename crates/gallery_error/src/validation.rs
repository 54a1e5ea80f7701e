//! Validation error types.

/// Rejected user input: empty content, malformed form data.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", message, line, file)]
pub struct ValidationError {
    /// Message suitable for showing to the submitter
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use gallery_error::ValidationError;
    ///
    /// let err = ValidationError::new("Please add some content before submitting.");
    /// assert!(err.to_string().contains("Please add some content"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
