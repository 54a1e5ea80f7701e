//! Media encoding for Walk Gallery.
//!
//! Uploaded bytes become a [`PostContent`](gallery_core::PostContent) in one
//! of two forms:
//!
//! - **Remote**: uploaded to a [`MediaStore`] (Cloudinary) and stored as a URL
//! - **Inline**: embedded in the row as base64
//!
//! The [`MediaEncoder`] prefers the remote store when one is configured and
//! falls back to inline data when the upload fails, so a CDN outage never
//! blocks a submission.
//!
//! # Example
//!
//! ```rust
//! use gallery_core::{MediaKind, MediaSource, PostContent};
//! use gallery_storage::MediaEncoder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let encoder = MediaEncoder::inline_only();
//! let content = encoder
//!     .encode(MediaKind::Image, Some("walk.png".into()), None, b"\x89PNG")
//!     .await?;
//!
//! let payload = content.payload().unwrap();
//! assert!(matches!(payload.source, MediaSource::Inline(_)));
//! assert_eq!(payload.mime, "image/png");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cloudinary;
mod encoder;
mod store;

pub use cloudinary::{CloudinaryConfig, CloudinaryStore, DEFAULT_API_BASE, sign_params};
pub use encoder::MediaEncoder;
pub use gallery_error::{StorageError, StorageErrorKind};
pub use store::{MediaMetadata, MediaReference, MediaStore};
