// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marketplace settings: carrier credentials, default courier, pickup
//! location, and the last carrier token. The token is persisted for
//! observability only; every carrier call fetches a fresh one regardless.

use rusqlite::params;
use vendaro_core::VendaroError;

use crate::database::{map_tr_err, Database};
use crate::models::Settings;

/// Read the settings singleton row.
pub async fn get(db: &Database) -> Result<Settings, VendaroError> {
    db.connection()
        .call(|conn| {
            let settings = conn.query_row(
                "SELECT carrier_email, carrier_password, default_courier_id,
                        pickup_location, pickup_postcode,
                        last_carrier_token, last_carrier_token_at
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(Settings {
                        carrier_email: row.get(0)?,
                        carrier_password: row.get(1)?,
                        default_courier_id: row.get(2)?,
                        pickup_location: row.get(3)?,
                        pickup_postcode: row.get(4)?,
                        last_carrier_token: row.get(5)?,
                        last_carrier_token_at: row.get(6)?,
                    })
                },
            )?;
            Ok(settings)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the operator-editable settings fields.
pub async fn update(db: &Database, settings: Settings) -> Result<(), VendaroError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE settings
                 SET carrier_email = ?1, carrier_password = ?2,
                     default_courier_id = ?3, pickup_location = ?4,
                     pickup_postcode = ?5
                 WHERE id = 1",
                params![
                    settings.carrier_email,
                    settings.carrier_password,
                    settings.default_courier_id,
                    settings.pickup_location,
                    settings.pickup_postcode,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Record the most recently fetched carrier token and when it was obtained.
pub async fn record_carrier_token(db: &Database, token: &str) -> Result<(), VendaroError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE settings
                 SET last_carrier_token = ?1,
                     last_carrier_token_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = 1",
                params![token],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
