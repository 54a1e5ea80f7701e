//! Upgrades for `posts` tables created by earlier versions of the gallery.
//!
//! Earlier versions created `posts(id, timestamp, datetime, content)` with
//! nullable text columns, `content BLOB` on SQLite and `content JSONB` on
//! PostgreSQL, and no `created_at`. The embedded migrations use
//! `CREATE TABLE IF NOT EXISTS`, so such a table has to be brought up to the
//! current shape before they run.

use crate::DatabaseResult;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

/// One column of the existing `posts` table.
#[derive(Debug, QueryableByName)]
struct ColumnInfo {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
}

#[cfg(feature = "sqlite")]
#[derive(Debug, QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

/// What an existing table lacks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Upgrade {
    add_created_at: bool,
    content_to_text: bool,
}

impl Upgrade {
    fn inspect(columns: &[ColumnInfo]) -> Self {
        if columns.is_empty() {
            return Self::default();
        }
        let content_type = columns
            .iter()
            .find(|c| c.name == "content")
            .map(|c| c.data_type.to_ascii_lowercase());
        Self {
            add_created_at: !columns.iter().any(|c| c.name == "created_at"),
            content_to_text: content_type.is_some_and(|t| t != "text"),
        }
    }

    fn is_needed(&self) -> bool {
        self.add_created_at || self.content_to_text
    }
}

#[cfg(feature = "sqlite")]
const SQLITE_REBUILD: &str = r#"
ALTER TABLE posts RENAME TO posts_legacy;
CREATE TABLE posts (
    id TEXT PRIMARY KEY NOT NULL,
    timestamp TEXT NOT NULL,
    datetime TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
INSERT INTO posts (id, timestamp, datetime, content, created_at)
    SELECT id, COALESCE(timestamp, ''), COALESCE(datetime, ''), CAST(content AS TEXT), NULL
    FROM posts_legacy
    WHERE id IS NOT NULL AND content IS NOT NULL;
DELETE FROM posts_legacy WHERE id IS NOT NULL AND content IS NOT NULL;
"#;

/// Rebuild a legacy SQLite `posts` table in the current shape.
///
/// SQLite cannot add a column with a non-constant default, so the table is
/// recreated and its rows copied. Rows without an id or content cannot be
/// carried over; they stay behind in `posts_legacy`.
#[cfg(feature = "sqlite")]
#[tracing::instrument(skip(conn))]
pub(crate) fn upgrade_sqlite(conn: &mut diesel::SqliteConnection) -> DatabaseResult<()> {
    let columns = diesel::sql_query("SELECT name, type AS data_type FROM pragma_table_info('posts')")
        .load::<ColumnInfo>(conn)?;
    let upgrade = Upgrade::inspect(&columns);
    if !upgrade.is_needed() {
        return Ok(());
    }

    let leftover = conn.immediate_transaction(|conn| {
        conn.batch_execute(SQLITE_REBUILD)?;
        let left = diesel::sql_query("SELECT COUNT(*) AS n FROM posts_legacy")
            .get_result::<RowCount>(conn)?
            .n;
        if left == 0 {
            conn.batch_execute("DROP TABLE posts_legacy;")?;
        }
        Ok::<_, diesel::result::Error>(left)
    })?;

    if leftover > 0 {
        tracing::warn!(rows = leftover, "Rows without id or content kept in posts_legacy");
    }
    tracing::info!(?upgrade, "Upgraded legacy SQLite posts table");
    Ok(())
}

/// Bring a legacy PostgreSQL `posts` table to the current shape in place.
///
/// Existing rows get a NULL `created_at`; new rows get the insertion time.
#[cfg(feature = "postgres")]
#[tracing::instrument(skip(conn))]
pub(crate) fn upgrade_postgres(conn: &mut diesel::PgConnection) -> DatabaseResult<()> {
    let columns = diesel::sql_query(
        "SELECT column_name::text AS name, data_type::text AS data_type \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = 'posts'",
    )
    .load::<ColumnInfo>(conn)?;
    let upgrade = Upgrade::inspect(&columns);
    if !upgrade.is_needed() {
        return Ok(());
    }

    let mut statements = String::new();
    if upgrade.content_to_text {
        statements.push_str("ALTER TABLE posts ALTER COLUMN content TYPE TEXT USING content::text;");
    }
    if upgrade.add_created_at {
        statements.push_str(
            "UPDATE posts SET timestamp = '' WHERE timestamp IS NULL;
             UPDATE posts SET datetime = '' WHERE datetime IS NULL;
             ALTER TABLE posts ALTER COLUMN timestamp SET NOT NULL;
             ALTER TABLE posts ALTER COLUMN datetime SET NOT NULL;
             ALTER TABLE posts ADD COLUMN created_at TIMESTAMP;
             ALTER TABLE posts ALTER COLUMN created_at SET DEFAULT CURRENT_TIMESTAMP;",
        );
    }

    conn.transaction(|conn| conn.batch_execute(&statements))?;
    tracing::info!(?upgrade, "Upgraded legacy PostgreSQL posts table");
    Ok(())
}
