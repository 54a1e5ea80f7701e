//! Request handlers.

use crate::render::{render_gallery, render_index, Layout};
use crate::{ApiError, AppState};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use gallery_core::{MediaKind, Post, PostContent, Resolved};
use gallery_error::{GalleryError, ServerError, ServerErrorKind, ValidationError};
use serde_json::json;
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Message returned when a submission carries no usable input.
pub(crate) const EMPTY_SUBMISSION: &str = "Please add some content before submitting.";

/// One file field from the submission form.
#[derive(Debug)]
struct Upload {
    filename: Option<String>,
    mime: Option<String>,
    data: Vec<u8>,
}

/// Inputs of one form submission; each present input becomes a post.
#[derive(Debug, Default)]
struct Submission {
    text: Option<String>,
    uploads: HashMap<MediaKind, Upload>,
}

impl Submission {
    async fn read(mut multipart: Multipart) -> Result<Self, GalleryError> {
        let mut submission = Submission::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::new(ServerErrorKind::Multipart(e.body_text())))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);
            let mime = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::new(ServerErrorKind::Multipart(e.body_text())))?;

            if name == "text" {
                let text = String::from_utf8(data.to_vec())
                    .map_err(|_| ValidationError::new("Text must be valid UTF-8"))?;
                if !text.trim().is_empty() {
                    submission.text = Some(text);
                }
                continue;
            }

            match name.parse::<MediaKind>() {
                // Browsers send an empty part for file inputs left blank.
                Ok(_) if data.is_empty() => {}
                Ok(kind) => {
                    submission.uploads.insert(
                        kind,
                        Upload {
                            filename,
                            mime,
                            data: data.to_vec(),
                        },
                    );
                }
                Err(_) => tracing::debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        Ok(submission)
    }

    fn is_empty(&self) -> bool {
        self.text.is_none() && self.uploads.is_empty()
    }
}

/// `GET /`
#[tracing::instrument(skip(state))]
pub(crate) async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let count = state.repo.count().await?;
    Ok(Html(render_index(count)))
}

/// `GET /gallery`
#[tracing::instrument(skip(state))]
pub(crate) async fn gallery(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let posts = state.repo.list_all().await?;
    Ok(Html(render_gallery(&posts, Layout::Served)))
}

/// `POST /posts`
///
/// Each input is inserted as its own post, one after another. Inserts are
/// not transactional: if one fails, the posts already inserted for this
/// submission stay stored and the error is returned.
#[tracing::instrument(skip(state, multipart))]
pub(crate) async fn create_posts(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let mut submission = Submission::read(multipart).await?;
    if submission.is_empty() {
        return Err(GalleryError::from(ValidationError::new(EMPTY_SUBMISSION)).into());
    }

    let mut contents = Vec::new();
    if let Some(text) = submission.text {
        contents.push(PostContent::text(text).map_err(GalleryError::from)?);
    }
    for kind in MediaKind::iter() {
        if let Some(upload) = submission.uploads.remove(&kind) {
            contents.push(
                state
                    .encoder
                    .encode(kind, upload.filename, upload.mime, &upload.data)
                    .await?,
            );
        }
    }

    // Another process may have written newer posts since the last stamp.
    if let Some(latest) = state.repo.latest_timestamp().await? {
        state.clock.resume_after(&latest);
    }

    let total = contents.len();
    for (stored, content) in contents.into_iter().enumerate() {
        let post = Post::new(content, &state.clock);
        if let Err(e) = state.repo.insert(&post).await {
            if stored > 0 {
                tracing::warn!(stored, total, error = %e, "Submission only partly stored");
            }
            return Err(e.into());
        }
        tracing::info!(id = %post.id, kind = post.content.label(), "Post added");
    }

    Ok(Redirect::to("/gallery"))
}

/// `GET /api/posts`
#[tracing::instrument(skip(state))]
pub(crate) async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.repo.list_all().await?))
}

/// `GET /posts/{id}/media`
#[tracing::instrument(skip(state))]
pub(crate) async fn post_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let post = state
        .repo
        .list_all()
        .await?
        .into_iter()
        .find(|post| post.id == id)
        .ok_or_else(|| ApiError::not_found(format!("No post with id {}", id)))?;

    let payload = post
        .content
        .payload()
        .ok_or_else(|| ApiError::not_found("Text posts have no media"))?;

    match payload.source.resolve().map_err(GalleryError::from)? {
        Resolved::Bytes(bytes) => {
            let kind = post.content.kind().unwrap_or(MediaKind::Image);
            Ok((
                [
                    (header::CONTENT_TYPE, kind.sanitize_mime(Some(&payload.mime))),
                    (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
                ],
                bytes,
            )
                .into_response())
        }
        Resolved::Url(url) => Ok(Redirect::temporary(url).into_response()),
    }
}

/// `GET /health`
pub(crate) async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.repo.count().await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "backend": state.repo.backend_name(),
            "posts": posts,
        })),
    ))
}
