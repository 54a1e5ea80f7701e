//! Shared handler state.

use gallery_core::TimestampClock;
use gallery_interface::PostRepository;
use gallery_storage::MediaEncoder;
use std::sync::Arc;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Post store selected at startup
    pub repo: Arc<dyn PostRepository>,
    /// Media encoding policy
    pub encoder: MediaEncoder,
    /// Issues post timestamps
    pub clock: Arc<TimestampClock>,
}

impl AppState {
    /// Creates handler state with a fresh timestamp clock.
    pub fn new(repo: Arc<dyn PostRepository>, encoder: MediaEncoder) -> Self {
        Self {
            repo,
            encoder,
            clock: Arc::new(TimestampClock::new()),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.repo.backend_name())
            .field("encoder", &self.encoder)
            .finish()
    }
}
