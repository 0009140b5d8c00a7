use crate::config::Config;
use crate::model::{Bookmark, NewBookmark};
use anyhow::{Context, Result};
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_bookmarks_list.sql", include_str!("migrations/001_bookmarks_list.sql"))];

const IN_MEMORY: &str = ":memory:";

pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
}

/// Where a connection string points. Remote URLs go through the libsql
/// client, everything else is opened as a local SQLite file.
#[derive(Debug, PartialEq, Eq)]
pub enum Location<'a> {
    Memory,
    Remote(&'a str),
    File(&'a str),
}

impl<'a> Location<'a> {
    pub fn parse(conn_str: &'a str) -> Self {
        let s = conn_str.trim();
        if s == IN_MEMORY {
            Location::Memory
        } else if s.starts_with("libsql://") || s.starts_with("http://") || s.starts_with("https://") {
            Location::Remote(s)
        } else {
            Location::File(s)
        }
    }
}

impl Database {
    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    async fn open(db: LibsqlDatabase) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database { _db: db, conn })
    }

    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let db = match Location::parse(cfg.app.get_db()) {
            Location::Memory => {
                tracing::info!("[db] running against an in-memory database");
                Builder::new_local(IN_MEMORY).build().await?
            }
            Location::Remote(url) => {
                tracing::info!("[db] running against remote database");
                let token = cfg.app.database_auth_token.clone().unwrap_or_default();
                Builder::new_remote(url.to_string(), token).build().await?
            }
            Location::File(file) => {
                let path = data_dir.join(file);
                tracing::info!(path = ?path, "[db] running against local database");
                Builder::new_local(&path).build().await?
            }
        };

        Self::open(db).await
    }

    /// Migrated, empty in-process database.
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(IN_MEMORY).build().await?;
        Self::open(db).await
    }

    pub async fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let query = r#"
            SELECT id, title, url, description, rating
            FROM bookmarks_list
            ORDER BY id ASC
        "#;

        let mut rows = self.conn.query(query, ()).await.context("failed to list bookmarks")?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    pub async fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = r#"
            SELECT id, title, url, description, rating
            FROM bookmarks_list WHERE id = ?
        "#;

        let mut rows = self
            .conn
            .query(query, libsql::params![id])
            .await
            .with_context(|| format!("failed to get bookmark {id}"))?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn insert_bookmark(&self, input: &NewBookmark) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks_list (title, url, description, rating)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, url, description, rating
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![
                    input.title.as_str(),
                    input.url.as_str(),
                    input.description.clone(),
                    input.rating
                ],
            )
            .await
            .context("failed to insert bookmark")?;

        if let Some(row) = rows.next().await? {
            Ok(Self::row_to_bookmark(&row)?)
        } else {
            anyhow::bail!("Failed to create bookmark")
        }
    }

    /// Writes every column of `bookmark`. Returns false when the row is gone.
    pub async fn update_bookmark(&self, bookmark: &Bookmark) -> Result<bool> {
        let query = r#"
            UPDATE bookmarks_list
            SET title = ?, url = ?, description = ?, rating = ?
            WHERE id = ?
        "#;

        let affected = self
            .conn
            .execute(
                query,
                libsql::params![
                    bookmark.title.as_str(),
                    bookmark.url.as_str(),
                    bookmark.description.clone(),
                    bookmark.rating,
                    bookmark.id
                ],
            )
            .await
            .with_context(|| format!("failed to update bookmark {}", bookmark.id))?;
        Ok(affected > 0)
    }

    pub async fn delete_bookmark(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks_list WHERE id = ?", libsql::params![id])
            .await
            .with_context(|| format!("failed to delete bookmark {id}"))?;
        Ok(affected > 0)
    }

    /// Empties `bookmarks_list` and restarts id generation. Used by test
    /// fixtures between cases; the returned future completes only once the
    /// table is empty.
    pub async fn reset(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                DELETE FROM bookmarks_list;
                DELETE FROM sqlite_sequence WHERE name = 'bookmarks_list';
                "#,
            )
            .await
            .context("failed to reset bookmarks_list")?;
        Ok(())
    }

    /// Inserts fixture rows with their ids as given.
    pub async fn seed(&self, bookmarks: &[Bookmark]) -> Result<()> {
        let query = r#"
            INSERT INTO bookmarks_list (id, title, url, description, rating)
            VALUES (?, ?, ?, ?, ?)
        "#;

        for bm in bookmarks {
            self.conn
                .execute(
                    query,
                    libsql::params![
                        bm.id,
                        bm.title.as_str(),
                        bm.url.as_str(),
                        bm.description.clone(),
                        bm.rating
                    ],
                )
                .await
                .with_context(|| format!("failed to seed bookmark {}", bm.id))?;
        }
        Ok(())
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            rating: row.get(4)?,
        })
    }
}
