//! End-to-end tests for the HTTP surface against a throwaway SQLite store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use gallery_core::{
    MediaKind, MediaPayload, MediaSource, Post, PostContent, StoredPost, TimestampClock,
};
use gallery_error::{DatabaseError, DatabaseErrorKind, GalleryResult};
use gallery_interface::PostRepository;
use gallery_database::{connect, DatabaseConfig};
use gallery_server::{create_router, AppState, ServerConfig};
use gallery_storage::{CloudinaryConfig, CloudinaryStore, MediaEncoder, MediaStore};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "walk-gallery-test-boundary";

/// A form field: name, optional filename and content type, body.
struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    mime: Option<&'a str>,
    data: &'a [u8],
}

fn text_part(text: &str) -> Part<'_> {
    Part {
        name: "text",
        filename: None,
        mime: None,
        data: text.as_bytes(),
    }
}

fn file_part<'a>(name: &'a str, filename: &'a str, mime: &'a str, data: &'a [u8]) -> Part<'a> {
    Part {
        name,
        filename: Some(filename),
        mime: Some(mime),
        data,
    }
}

fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if let Some(mime) = part.mime {
            body.extend_from_slice(format!("Content-Type: {}\r\n", mime).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/posts")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn app_with(encoder: MediaEncoder) -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let repo = connect(&DatabaseConfig::sqlite(dir.path().join("gallery.db")))
        .await
        .unwrap();
    let router = create_router(AppState::new(repo, encoder), &ServerConfig::default());
    (router, dir)
}

async fn app() -> (Router, TempDir) {
    app_with(MediaEncoder::inline_only()).await
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

async fn list(router: &Router) -> Vec<Post> {
    let response = router.clone().oneshot(get("/api/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_reports_backend_and_count() {
    let (router, _dir) = app().await;

    let response = router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({"status": "ok", "backend": "sqlite", "posts": 0}));
}

#[tokio::test]
async fn test_text_submission_redirects_and_lists_one_post() {
    let (router, _dir) = app().await;

    let response = router
        .clone()
        .oneshot(multipart_request(&[text_part("Yay!")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/gallery");

    let posts = list(&router).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, PostContent::Text("Yay!".to_string()));

    let gallery = body_text(router.clone().oneshot(get("/gallery")).await.unwrap()).await;
    assert!(gallery.contains("YAY!"));

    let index = body_text(router.oneshot(get("/")).await.unwrap()).await;
    assert!(index.contains("href=\"/gallery\""));
}

#[tokio::test]
async fn test_empty_submission_is_rejected() {
    let (router, _dir) = app().await;

    let response = router
        .clone()
        .oneshot(multipart_request(&[
            text_part("   "),
            file_part("image", "", "application/octet-stream", b""),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "Please add some content before submitting.");

    assert!(list(&router).await.is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_is_a_client_error() {
    let (router, _dir) = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_each_input_becomes_its_own_post_in_form_order() {
    let (router, _dir) = app().await;

    let response = router
        .clone()
        .oneshot(multipart_request(&[
            file_part("drawing", "sketch.png", "image/png", b"drawing bytes"),
            file_part("audio", "clip.wav", "audio/wav", b"audio bytes"),
            text_part("hello"),
            file_part("image", "walk.png", "image/png", b"image bytes"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let posts = list(&router).await;
    let labels: Vec<_> = posts.iter().map(|p| p.content.label()).collect();
    assert_eq!(labels, vec!["text", "image", "audio", "drawing"]);
    for pair in posts.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}

#[tokio::test]
async fn test_inline_image_is_served_back_with_its_mime_type() {
    let (router, _dir) = app().await;
    let bytes = b"not really a jpeg";

    router
        .clone()
        .oneshot(multipart_request(&[file_part("image", "walk.jpg", "image/jpeg", bytes)]))
        .await
        .unwrap();

    let posts = list(&router).await;
    let payload = posts[0].content.payload().unwrap();
    assert!(!payload.source.is_url());
    assert_eq!(payload.mime, "image/jpeg");
    assert_eq!(payload.name.as_deref(), Some("walk.jpg"));

    let response = router
        .clone()
        .oneshot(get(&format!("/posts/{}/media", posts[0].id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(body_bytes(response).await, bytes);

    let gallery = body_text(router.oneshot(get("/gallery")).await.unwrap()).await;
    assert!(gallery.contains("src=\"data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_media_endpoint_404s_for_text_and_unknown_posts() {
    let (router, _dir) = app().await;
    router
        .clone()
        .oneshot(multipart_request(&[text_part("words only")]))
        .await
        .unwrap();
    let id = list(&router).await[0].id.clone();

    let text = router
        .clone()
        .oneshot(get(&format!("/posts/{}/media", id)))
        .await
        .unwrap();
    assert_eq!(text.status(), StatusCode::NOT_FOUND);

    let missing = router.oneshot(get("/posts/nope/media")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

fn remote_encoder(server: &MockServer) -> MediaEncoder {
    let store = CloudinaryStore::new(
        CloudinaryConfig::new("demo", "key", "secret").with_api_base(server.uri()),
    )
    .unwrap();
    MediaEncoder::with_remote(Arc::new(store) as Arc<dyn MediaStore>)
}

#[tokio::test]
async fn test_remote_store_url_is_stored_and_redirected_to() {
    let server = MockServer::start().await;
    let hosted = "https://res.cloudinary.com/demo/image/upload/v1/walk_gallery/walk.png";
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": hosted,
            "url": "http://res.cloudinary.com/demo/image/upload/v1/walk_gallery/walk.png",
            "public_id": "walk_gallery/walk",
            "bytes": 11,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (router, _dir) = app_with(remote_encoder(&server)).await;
    router
        .clone()
        .oneshot(multipart_request(&[file_part("image", "walk.png", "image/png", b"image bytes")]))
        .await
        .unwrap();

    let posts = list(&router).await;
    let payload = posts[0].content.payload().unwrap();
    assert_eq!(payload.source, MediaSource::Url(hosted.to_string()));
    assert_eq!(posts[0].content.kind(), Some(MediaKind::Image));

    let response = router
        .oneshot(get(&format!("/posts/{}/media", posts[0].id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], hosted);
}

#[tokio::test]
async fn test_failing_remote_store_falls_back_to_inline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let (router, _dir) = app_with(remote_encoder(&server)).await;
    let response = router
        .clone()
        .oneshot(multipart_request(&[file_part("image", "walk.png", "image/png", b"image bytes")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let posts = list(&router).await;
    let payload = posts[0].content.payload().unwrap();
    assert_eq!(payload.source, MediaSource::inline(b"image bytes"));
}

#[tokio::test]
async fn test_mismatched_upload_type_is_not_served_as_html() {
    let (router, _dir) = app().await;
    let script = b"<script>alert(document.cookie)</script>";

    router
        .clone()
        .oneshot(multipart_request(&[file_part("image", "x.html", "text/html", script)]))
        .await
        .unwrap();

    let posts = list(&router).await;
    assert_eq!(posts[0].content.payload().unwrap().mime, "image/png");

    let response = router
        .oneshot(get(&format!("/posts/{}/media", posts[0].id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn test_stored_media_with_foreign_type_is_served_with_kind_default() {
    let dir = TempDir::new().unwrap();
    let repo = connect(&DatabaseConfig::sqlite(dir.path().join("gallery.db")))
        .await
        .unwrap();
    let post = Post::new(
        PostContent::media(
            MediaKind::Audio,
            MediaPayload {
                name: None,
                mime: "text/html".to_string(),
                source: MediaSource::inline(b"<b>hi</b>"),
            },
        ),
        &TimestampClock::new(),
    );
    repo.insert(&post).await.unwrap();
    let router = create_router(
        AppState::new(repo, MediaEncoder::inline_only()),
        &ServerConfig::default(),
    );

    let response = router
        .oneshot(get(&format!("/posts/{}/media", post.id)))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn test_new_posts_sort_after_posts_written_elsewhere() {
    let dir = TempDir::new().unwrap();
    let repo = connect(&DatabaseConfig::sqlite(dir.path().join("gallery.db")))
        .await
        .unwrap();
    let router = create_router(
        AppState::new(repo.clone(), MediaEncoder::inline_only()),
        &ServerConfig::default(),
    );

    let mut ahead = Post::new(
        PostContent::text("from another process").unwrap(),
        &TimestampClock::new(),
    );
    ahead.timestamp = "29991231_235959.000000".to_string();
    repo.insert(&ahead).await.unwrap();

    router
        .clone()
        .oneshot(multipart_request(&[text_part("newest")]))
        .await
        .unwrap();

    let posts = list(&router).await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].content, PostContent::Text("newest".to_string()));
    assert!(posts[1].timestamp > ahead.timestamp);
}

/// Store that accepts a fixed number of inserts, then loses its connection.
struct FailingAfter {
    inner: Arc<dyn PostRepository>,
    remaining: AtomicUsize,
}

#[async_trait]
impl PostRepository for FailingAfter {
    async fn insert(&self, post: &Post) -> GalleryResult<()> {
        if self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
        {
            return Err(DatabaseError::new(DatabaseErrorKind::Connection("gone".into())).into());
        }
        self.inner.insert(post).await
    }

    async fn list_all(&self) -> GalleryResult<Vec<Post>> {
        self.inner.list_all().await
    }

    async fn list_stored(&self) -> GalleryResult<Vec<StoredPost>> {
        self.inner.list_stored().await
    }

    async fn insert_stored(&self, post: &StoredPost) -> GalleryResult<()> {
        self.inner.insert_stored(post).await
    }

    async fn latest_timestamp(&self) -> GalleryResult<Option<String>> {
        self.inner.latest_timestamp().await
    }

    async fn count(&self) -> GalleryResult<i64> {
        self.inner.count().await
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn test_failed_insert_mid_submission_keeps_earlier_posts() {
    let dir = TempDir::new().unwrap();
    let inner = connect(&DatabaseConfig::sqlite(dir.path().join("gallery.db")))
        .await
        .unwrap();
    let repo = Arc::new(FailingAfter {
        inner: inner.clone(),
        remaining: AtomicUsize::new(1),
    });
    let router = create_router(
        AppState::new(repo, MediaEncoder::inline_only()),
        &ServerConfig::default(),
    );

    let response = router
        .oneshot(multipart_request(&[
            text_part("kept"),
            file_part("image", "walk.png", "image/png", b"image bytes"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let posts = inner.list_all().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, PostContent::Text("kept".to_string()));
}
