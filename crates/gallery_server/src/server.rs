//! Listener setup and graceful shutdown.

use crate::{create_router, AppState, ServerConfig};
use gallery_error::{GalleryResult, ServerError, ServerErrorKind};
use std::future::Future;
use tokio::net::TcpListener;

/// Resolves when Ctrl-C is received.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping gracefully");
}

/// Bind `config.bind` and serve until `shutdown` resolves.
///
/// # Errors
///
/// Returns `ServerErrorKind::Bind` if the address cannot be bound and
/// `ServerErrorKind::Serve` if the server stops with an I/O error.
#[tracing::instrument(skip(state, shutdown), fields(bind = %config.bind, backend = state.repo.backend_name()))]
pub async fn serve<F>(state: AppState, config: &ServerConfig, shutdown: F) -> GalleryResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(&config.bind).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind(format!("{}: {}", config.bind, e)))
    })?;
    let local = listener
        .local_addr()
        .map_err(|e| ServerError::new(ServerErrorKind::Bind(e.to_string())))?;

    tracing::info!(
        address = %local,
        media = state.encoder.remote_name().unwrap_or("inline"),
        "Walk Gallery listening"
    );

    let router = create_router(state, config);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    tracing::info!("Server stopped");
    Ok(())
}
