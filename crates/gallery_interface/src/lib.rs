//! Trait interfaces for Walk Gallery.
//!
//! The persistence layer is expressed as the [`PostRepository`] trait so the
//! embedded and networked stores can be selected once at startup and shared
//! behind an `Arc<dyn PostRepository>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod repository;

pub use repository::PostRepository;
