//! Mapping of gallery errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gallery_error::{
    DatabaseErrorKind, GalleryError, GalleryErrorKind, ServerErrorKind, StorageErrorKind,
};
use serde_json::json;

/// Error returned from handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Message shown to the client
    pub message: String,
}

impl ApiError {
    /// Error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        let (status, message) = match err.kind() {
            GalleryErrorKind::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.message.clone()),
            GalleryErrorKind::Server(e) => match &e.kind {
                ServerErrorKind::Multipart(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
            },
            GalleryErrorKind::Database(e) => match &e.kind {
                DatabaseErrorKind::UniqueViolation(_) => {
                    (StatusCode::CONFLICT, "Post already exists".to_string())
                }
                _ if e.is_connection() => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database is unavailable".to_string(),
                ),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            },
            GalleryErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::Decode(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Stored media is corrupt".to_string(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %err, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %err, "Request rejected");
        }

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_error::{DatabaseError, ServerError, ValidationError};

    #[test]
    fn validation_is_unprocessable() {
        let err: GalleryError = ValidationError::new("Please add some content").into();
        let api = ApiError::from(err);
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.message, "Please add some content");
    }

    #[test]
    fn database_kinds_map_to_distinct_statuses() {
        let conflict: GalleryError =
            DatabaseError::new(DatabaseErrorKind::UniqueViolation("posts_pkey".into())).into();
        let down: GalleryError =
            DatabaseError::new(DatabaseErrorKind::Pool("timed out".into())).into();
        let query: GalleryError =
            DatabaseError::new(DatabaseErrorKind::Query("syntax".into())).into();

        assert_eq!(ApiError::from(conflict).status, StatusCode::CONFLICT);
        assert_eq!(ApiError::from(down).status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::from(query).status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_multipart_is_bad_request() {
        let err: GalleryError =
            ServerError::new(ServerErrorKind::Multipart("unexpected end".into())).into();
        assert_eq!(ApiError::from(err).status, StatusCode::BAD_REQUEST);
    }
}
