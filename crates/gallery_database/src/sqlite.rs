//! Embedded SQLite implementation of PostRepository.

use crate::models::{rows_to_posts, NewPostRow, PostRow};
use crate::pool::{build_error, migration_error, with_connection};
use crate::schema::posts;
use crate::{DatabaseConfig, DatabaseResult};

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use gallery_core::{Post, StoredPost};
use gallery_error::{DatabaseError, DatabaseErrorKind, GalleryResult};
use gallery_interface::PostRepository;
use std::path::Path;
use std::time::Duration;

/// Embedded migrations for the SQLite schema.
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

const MEMORY_PATH: &str = ":memory:";

/// Per-connection pragmas applied when the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        );
        if self.wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// SQLite post repository backed by an r2d2 pool.
///
/// # Example
///
/// ```no_run
/// use gallery_database::{DatabaseConfig, SqlitePostRepository};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = SqlitePostRepository::open(&DatabaseConfig::sqlite("data/gallery.db"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl SqlitePostRepository {
    /// Open (creating if needed) the database file and apply migrations.
    ///
    /// Blocks while the pool opens its first connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the file
    /// cannot be opened, or migrations fail.
    #[tracing::instrument(skip(config), fields(path = %config.sqlite_path.display()))]
    pub fn open(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let path = &config.sqlite_path;
        let in_memory = path.as_os_str() == MEMORY_PATH;

        if !in_memory {
            ensure_parent_dir(path)?;
        }

        let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
        let mut builder = Pool::<ConnectionManager<SqliteConnection>>::builder()
            .connection_timeout(config.connect_timeout())
            .connection_customizer(Box::new(SqlitePragmas {
                busy_timeout: Duration::from_secs(5),
                wal: !in_memory,
            }));

        // Every connection to ":memory:" is its own database, so keep exactly one.
        builder = if in_memory {
            builder.max_size(1).min_idle(Some(1)).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(config.pool_size.max(1)).min_idle(Some(1))
        };

        let pool = builder
            .build(manager)
            .map_err(|e| build_error("sqlite", e))?;

        let mut conn = pool
            .get()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
        crate::legacy::upgrade_sqlite(&mut conn)?;
        let applied = conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map_err(|e| migration_error("sqlite", e))?;

        tracing::info!(migrations = applied.len(), "Opened SQLite post store");
        Ok(Self { pool })
    }
}

fn ensure_parent_dir(path: &Path) -> DatabaseResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::new(DatabaseErrorKind::Connection(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                )))
            })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    #[tracing::instrument(skip(self, post), fields(id = %post.id, kind = post.content.label(), backend = "sqlite"))]
    async fn insert(&self, post: &Post) -> GalleryResult<()> {
        let row = NewPostRow::from_post(post)?;

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(posts::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
        .await?;

        tracing::debug!("Inserted post");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(backend = "sqlite"))]
    async fn list_all(&self) -> GalleryResult<Vec<Post>> {
        let rows = with_connection(&self.pool, |conn| {
            let rows = posts::table
                .order((posts::timestamp.asc(), posts::id.asc()))
                .select(PostRow::as_select())
                .load::<PostRow>(conn)?;
            Ok(rows)
        })
        .await?;

        let posts = rows_to_posts(rows);
        tracing::debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    #[tracing::instrument(skip(self), fields(backend = "sqlite"))]
    async fn list_stored(&self) -> GalleryResult<Vec<StoredPost>> {
        let rows = with_connection(&self.pool, |conn| {
            let rows = posts::table
                .order((posts::timestamp.asc(), posts::id.asc()))
                .select(PostRow::as_select())
                .load::<PostRow>(conn)?;
            Ok(rows)
        })
        .await?;

        Ok(rows.into_iter().map(PostRow::into_stored).collect())
    }

    #[tracing::instrument(skip(self, post), fields(id = %post.id, backend = "sqlite"))]
    async fn insert_stored(&self, post: &StoredPost) -> GalleryResult<()> {
        let row = NewPostRow::from_stored(post);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(posts::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(backend = "sqlite"))]
    async fn latest_timestamp(&self) -> GalleryResult<Option<String>> {
        with_connection(&self.pool, |conn| {
            Ok(posts::table
                .select(diesel::dsl::max(posts::timestamp))
                .get_result::<Option<String>>(conn)?)
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(backend = "sqlite"))]
    async fn count(&self) -> GalleryResult<i64> {
        with_connection(&self.pool, |conn| {
            Ok(posts::table.count().get_result::<i64>(conn)?)
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
