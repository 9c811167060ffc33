// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use vendaro_core::VendaroError;

use crate::migrations;

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, set PRAGMAs, and run
    /// any pending migrations.
    pub async fn open(path: &str) -> Result<Self, VendaroError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| VendaroError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| VendaroError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            migrations::apply(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the database, flushing the WAL.
    pub async fn close(self) -> Result<(), VendaroError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> VendaroError {
    VendaroError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(names)
            })
            .await
            .map_err(map_tr_err)
            .unwrap();

        for expected in ["users", "products", "orders", "order_items", "settings"] {
            assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();

        // Re-opening must not re-run migrations destructively.
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let version: i64 = db
            .connection()
            .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
            .await
            .map_err(map_tr_err)
            .unwrap();
        assert!(version >= 1);
        db.close().await.unwrap();
    }
}
