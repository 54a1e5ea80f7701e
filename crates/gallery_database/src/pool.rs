//! Connection pool helpers shared by both backends.

use crate::DatabaseResult;
use diesel::r2d2::{ConnectionManager, Pool, R2D2Connection};
use gallery_error::{DatabaseError, DatabaseErrorKind, GalleryResult};

/// Run `f` with a pooled connection on the blocking thread pool.
///
/// Diesel is synchronous; this keeps queries off the async workers.
pub(crate) async fn with_connection<C, T, F>(
    pool: &Pool<ConnectionManager<C>>,
    f: F,
) -> GalleryResult<T>
where
    C: R2D2Connection + Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut C) -> DatabaseResult<T> + Send + 'static,
{
    let pool = pool.clone();

    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| {
        DatabaseError::new(DatabaseErrorKind::Query(format!(
            "Blocking database task failed: {}",
            e
        )))
    })?;

    Ok(result?)
}

/// Map a pool construction failure to a connection error.
pub(crate) fn build_error(backend: &str, err: diesel::r2d2::PoolError) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Connection(format!(
        "Could not connect to {} database: {}",
        backend, err
    )))
}

/// Map a migration failure.
pub(crate) fn migration_error(
    backend: &str,
    err: Box<dyn std::error::Error + Send + Sync>,
) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Migration(format!(
        "{} migrations failed: {}",
        backend, err
    )))
}
