//! PostgreSQL implementation of PostRepository.

use crate::models::{rows_to_posts, NewPostRow, PostRow};
use crate::pool::{build_error, migration_error, with_connection};
use crate::schema::posts;
use crate::{DatabaseConfig, DatabaseResult};

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use gallery_core::{Post, StoredPost};
use gallery_error::{DatabaseError, DatabaseErrorKind, GalleryResult};
use gallery_interface::PostRepository;

/// Embedded migrations for the PostgreSQL schema.
pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

/// Normalize a PostgreSQL connection string.
///
/// - `postgres://` becomes `postgresql://`
/// - `sslmode=require` is added unless an `sslmode` is given
/// - `connect_timeout` is added unless one is given
///
/// Key/value connection strings (`host=... dbname=...`) get the same
/// parameters appended as space-separated pairs.
///
/// # Examples
///
/// ```
/// use gallery_database::normalize_postgres_url;
///
/// assert_eq!(
///     normalize_postgres_url("postgres://u:p@db.example.com/gallery", 10),
///     "postgresql://u:p@db.example.com/gallery?sslmode=require&connect_timeout=10",
/// );
/// assert_eq!(
///     normalize_postgres_url("postgresql://localhost/g?sslmode=disable", 5),
///     "postgresql://localhost/g?sslmode=disable&connect_timeout=5",
/// );
/// ```
pub fn normalize_postgres_url(url: &str, connect_timeout_secs: u64) -> String {
    let url = url.trim();
    let mut normalized = match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    };

    let is_uri = normalized.contains("://");
    let mut extra = Vec::new();
    if !normalized.contains("sslmode=") {
        extra.push("sslmode=require".to_string());
    }
    if !normalized.contains("connect_timeout=") {
        extra.push(format!("connect_timeout={}", connect_timeout_secs.max(1)));
    }

    for param in extra {
        if is_uri {
            let separator = if normalized.contains('?') { '&' } else { '?' };
            normalized.push(separator);
        } else {
            normalized.push(' ');
        }
        normalized.push_str(&param);
    }

    normalized
}

/// Strip the password from a connection string for logging.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

/// PostgreSQL post repository backed by an r2d2 pool.
///
/// Connections require SSL unless the connection string says otherwise.
/// Pool construction fails once `connect_timeout_secs` elapses without a
/// connection; there is no fallback to another backend.
#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresPostRepository {
    /// Connect, build the pool and apply migrations.
    ///
    /// Blocks for up to the configured connection timeout.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseErrorKind::Connection` if the server is unreachable
    /// within the timeout, or `DatabaseErrorKind::Migration` if the schema
    /// cannot be applied.
    #[tracing::instrument(skip(url, config), fields(url = %redact(url)))]
    pub fn open(url: &str, config: &DatabaseConfig) -> DatabaseResult<Self> {
        let url = normalize_postgres_url(url, config.connect_timeout_secs);
        let manager = ConnectionManager::<PgConnection>::new(url);

        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .min_idle(Some(1))
            .connection_timeout(config.connect_timeout())
            .build(manager)
            .map_err(|e| build_error("postgres", e))?;

        let mut conn = pool
            .get()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
        crate::legacy::upgrade_postgres(&mut conn)?;
        let applied = conn
            .run_pending_migrations(POSTGRES_MIGRATIONS)
            .map_err(|e| migration_error("postgres", e))?;

        tracing::info!(migrations = applied.len(), "Connected to PostgreSQL post store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    #[tracing::instrument(skip(self, post), fields(id = %post.id, kind = post.content.label(), backend = "postgres"))]
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

    #[tracing::instrument(skip(self), fields(backend = "postgres"))]
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

    #[tracing::instrument(skip(self), fields(backend = "postgres"))]
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

    #[tracing::instrument(skip(self, post), fields(id = %post.id, backend = "postgres"))]
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

    #[tracing::instrument(skip(self), fields(backend = "postgres"))]
    async fn latest_timestamp(&self) -> GalleryResult<Option<String>> {
        with_connection(&self.pool, |conn| {
            Ok(posts::table
                .select(diesel::dsl::max(posts::timestamp))
                .get_result::<Option<String>>(conn)?)
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(backend = "postgres"))]
    async fn count(&self) -> GalleryResult<i64> {
        with_connection(&self.pool, |conn| {
            Ok(posts::table.count().get_result::<i64>(conn)?)
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
