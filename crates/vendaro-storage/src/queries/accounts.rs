// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account queries: user lookup and the accounts export projection.

use rusqlite::params;
use vendaro_core::VendaroError;

use crate::database::{map_tr_err, Database};
use crate::models::{AccountExport, User};

/// Insert a user. Returns the new row id.
pub async fn create(
    db: &Database,
    username: &str,
    email: &str,
    full_name: &str,
    phone: Option<&str>,
    role: &str,
) -> Result<i64, VendaroError> {
    let username = username.to_string();
    let email = email.to_string();
    let full_name = full_name.to_string();
    let phone = phone.map(str::to_string);
    let role = role.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (username, email, full_name, phone, role)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![username, email, full_name, phone, role],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a user by id.
pub async fn get(db: &Database, id: i64) -> Result<Option<User>, VendaroError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, email, full_name, phone, role, created_at
                 FROM users WHERE id = ?1",
            )?;
            let user = stmt
                .query_row(params![id], |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        full_name: row.get(3)?,
                        phone: row.get(4)?,
                        role: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;
            Ok(user)
        })
        .await
        .map_err(map_tr_err)
}

/// Full account projection for the backup exporter, ordered by id.
pub async fn list_for_export(db: &Database) -> Result<Vec<AccountExport>, VendaroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, email, full_name, phone, role, created_at
                 FROM users ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(AccountExport {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        full_name: row.get(3)?,
                        phone: row.get(4)?,
                        role: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}
