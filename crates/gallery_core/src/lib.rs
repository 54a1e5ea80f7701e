//! Core data types for Walk Gallery.
//!
//! A gallery is a list of [`Post`]s. Each post carries exactly one
//! [`PostContent`]: text, or an image, audio clip or drawing whose bytes are
//! either embedded inline or hosted on a remote media store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod content;
mod media_kind;
mod post;

pub use clock::{Stamp, TimestampClock, DATETIME_FORMAT, TIMESTAMP_FORMAT};
pub use content::{MediaPayload, MediaSource, PostContent, Resolved};
pub use media_kind::MediaKind;
pub use post::{Post, StoredPost};
