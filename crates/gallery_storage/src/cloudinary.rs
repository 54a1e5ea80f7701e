//! Cloudinary upload backend.
//!
//! Uses the signed upload API:
//!
//! ```text
//! POST {api_base}/v1_1/{cloud_name}/{resource_type}/upload
//! multipart: file, api_key, timestamp, folder, signature
//! ```
//!
//! The signature is the SHA-1 hex digest of the sorted `key=value` pairs
//! joined with `&`, followed by the API secret.

use crate::{MediaMetadata, MediaReference, MediaStore};
use gallery_core::MediaKind;
use gallery_error::{GalleryResult, HttpError, StorageError, StorageErrorKind};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;

/// Production Cloudinary API host.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Credentials and upload settings for Cloudinary.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Cloud name (account identifier)
    pub cloud_name: String,
    /// API key
    pub api_key: String,
    /// API secret used for request signing
    pub api_secret: String,
    /// Folder uploads are placed in; empty for the account root
    pub folder: String,
    /// API base URL (overridable for testing)
    pub api_base: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl CloudinaryConfig {
    /// Create a configuration with default folder, base URL and timeout.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: "walk_gallery".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Read credentials through an environment lookup.
    ///
    /// Reads `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY` and
    /// `CLOUDINARY_API_SECRET`. Returns `None` unless all three are set and
    /// non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use gallery_storage::CloudinaryConfig;
    ///
    /// let vars = |name: &str| match name {
    ///     "CLOUDINARY_CLOUD_NAME" => Some("demo".to_string()),
    ///     "CLOUDINARY_API_KEY" => Some("key".to_string()),
    ///     _ => None,
    /// };
    /// assert!(CloudinaryConfig::from_vars(vars).is_none());
    /// ```
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                Some(Self::new(cloud_name, api_key, api_secret))
            }
            _ => {
                tracing::debug!("Cloudinary credentials incomplete, media will be stored inline");
                None
            }
        }
    }

    /// Set the upload folder.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("folder", &self.folder)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Compute a Cloudinary request signature.
///
/// # Examples
///
/// ```
/// use gallery_storage::sign_params;
///
/// let signature = sign_params(
///     &[("timestamp", "1315060510"), ("public_id", "sample_image"), ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop")],
///     "abcd",
/// );
/// assert_eq!(signature, "bfd09f95f331f558cbd1320e67aa8d488770583e");
/// ```
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Successful upload response (fields we use).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: Option<String>,
    bytes: Option<i64>,
}

/// Error response body: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Cloudinary-backed media store.
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryStore {
    /// Create a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are blank or the HTTP client cannot be
    /// built.
    #[tracing::instrument(skip(config), fields(cloud_name = %config.cloud_name))]
    pub fn new(config: CloudinaryConfig) -> GalleryResult<Self> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            return Err(StorageError::new(StorageErrorKind::NotConfigured(
                "cloud name, API key and API secret are all required".to_string(),
            ))
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(folder = %config.folder, "Created Cloudinary media store");
        Ok(Self { config, client })
    }

    /// Cloudinary resource type for a media kind. Audio is uploaded as `video`.
    pub fn resource_type(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Image | MediaKind::Drawing => "image",
            MediaKind::Audio => "video",
        }
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            Self::resource_type(kind)
        )
    }
}

#[async_trait::async_trait]
impl MediaStore for CloudinaryStore {
    #[tracing::instrument(skip(self, data, metadata), fields(size = data.len(), kind = %metadata.kind))]
    async fn upload(
        &self,
        data: &[u8],
        metadata: &MediaMetadata,
    ) -> GalleryResult<MediaReference> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let filename = metadata
            .filename
            .clone()
            .unwrap_or_else(|| format!("{}.bin", metadata.kind));
        let file = Part::bytes(data.to_vec())
            .file_name(filename)
            .mime_str(&metadata.mime)
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Upload(format!(
                    "invalid MIME type {}: {}",
                    metadata.mime, e
                )))
            })?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);
        if !self.config.folder.is_empty() {
            form = form.text("folder", self.config.folder.clone());
        }

        let url = self.upload_url(metadata.kind);
        tracing::debug!(url = %url, "Uploading media");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Upload request to {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read upload response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), message = %message, "Cloudinary rejected upload");
            return Err(HttpError::with_status(status.as_u16(), message).into());
        }

        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidResponse(format!(
                "{}: {}",
                e, body
            )))
        })?;

        let url = parsed.secure_url.or(parsed.url).ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidResponse(
                "response carries no secure_url or url".to_string(),
            ))
        })?;

        tracing::info!(url = %url, "Uploaded media to Cloudinary");

        Ok(MediaReference {
            url,
            public_id: parsed.public_id,
            size_bytes: parsed.bytes.unwrap_or(data.len() as i64),
            storage_backend: "cloudinary",
        })
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_ignores_empty_params_and_sorts_keys() {
        let a = sign_params(&[("timestamp", "1"), ("folder", "f")], "s");
        let b = sign_params(&[("folder", "f"), ("timestamp", "1"), ("tags", "")], "s");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", CloudinaryConfig::new("demo", "key", "hunter2"));
        assert!(rendered.contains("demo"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(CloudinaryStore::new(CloudinaryConfig::new("demo", "", "secret")).is_err());
    }

    #[test]
    fn audio_uploads_as_video_resource() {
        assert_eq!(CloudinaryStore::resource_type(MediaKind::Audio), "video");
        assert_eq!(CloudinaryStore::resource_type(MediaKind::Drawing), "image");
    }

    #[test]
    fn upload_url_trims_trailing_slash() {
        let store = CloudinaryStore::new(
            CloudinaryConfig::new("demo", "key", "secret").with_api_base("http://localhost:9/"),
        )
        .unwrap();
        assert_eq!(
            store.upload_url(MediaKind::Image),
            "http://localhost:9/v1_1/demo/image/upload"
        );
    }
}
