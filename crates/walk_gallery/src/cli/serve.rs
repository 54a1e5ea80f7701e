//! `serve` command.

use walk_gallery::{serve, shutdown_signal, GalleryResult, Settings};

/// Open the store and serve HTTP until Ctrl-C.
pub async fn run_server(settings: &Settings, bind: Option<String>) -> GalleryResult<()> {
    let server = match bind {
        Some(bind) => settings.server.clone().with_bind(bind),
        None => settings.server.clone(),
    };

    let state = settings.app_state().await?;
    serve(state, &server, shutdown_signal()).await
}
