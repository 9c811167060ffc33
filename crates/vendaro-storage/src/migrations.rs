// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, versioned via `PRAGMA user_version`.
//!
//! Each entry in [`MIGRATIONS`] is applied in its own transaction; the
//! user_version pragma records how many have run so re-opening is a no-op.

/// Ordered migration scripts. Append only; never edit a shipped entry.
const MIGRATIONS: &[&str] = &[
    // V1: initial marketplace schema.
    "CREATE TABLE users (
        id          INTEGER PRIMARY KEY,
        username    TEXT NOT NULL UNIQUE,
        email       TEXT NOT NULL,
        full_name   TEXT NOT NULL,
        phone       TEXT,
        role        TEXT NOT NULL DEFAULT 'buyer',
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE products (
        id          INTEGER PRIMARY KEY,
        seller_id   INTEGER NOT NULL REFERENCES users(id),
        name        TEXT NOT NULL,
        sku         TEXT NOT NULL UNIQUE,
        category    TEXT,
        price       REAL NOT NULL,
        stock       INTEGER NOT NULL DEFAULT 0,
        weight_kg   REAL,
        length_cm   REAL,
        breadth_cm  REAL,
        height_cm   REAL,
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE orders (
        id                  INTEGER PRIMARY KEY,
        buyer_id            INTEGER NOT NULL REFERENCES users(id),
        status              TEXT NOT NULL DEFAULT 'pending',
        payment_method      TEXT NOT NULL DEFAULT 'prepaid',
        subtotal            REAL NOT NULL,
        shipping_name       TEXT NOT NULL,
        shipping_address    TEXT NOT NULL,
        shipping_city       TEXT NOT NULL,
        shipping_state      TEXT NOT NULL,
        shipping_postcode   TEXT NOT NULL,
        shipping_phone      TEXT,
        shipping_email      TEXT,
        carrier_order_id    TEXT,
        carrier_shipment_id TEXT,
        tracking_code       TEXT,
        courier_name        TEXT,
        estimated_delivery  TEXT,
        shipping_status     TEXT NOT NULL DEFAULT 'unshipped',
        created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE order_items (
        id          INTEGER PRIMARY KEY,
        order_id    INTEGER NOT NULL REFERENCES orders(id),
        product_id  INTEGER NOT NULL REFERENCES products(id),
        quantity    INTEGER NOT NULL,
        unit_price  REAL NOT NULL
    );

    CREATE TABLE settings (
        id                    INTEGER PRIMARY KEY CHECK (id = 1),
        carrier_email         TEXT,
        carrier_password      TEXT,
        default_courier_id    INTEGER,
        pickup_location       TEXT NOT NULL DEFAULT 'Primary',
        pickup_postcode       TEXT,
        last_carrier_token    TEXT,
        last_carrier_token_at TEXT
    );
    INSERT INTO settings (id) VALUES (1);

    CREATE INDEX idx_orders_shippable
        ON orders(status, payment_method)
        WHERE carrier_order_id IS NULL;
    CREATE INDEX idx_order_items_order ON order_items(order_id);",
];

/// Run all pending migrations against the given connection.
pub fn apply(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    let applied: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", (index + 1) as i64)?;
        tx.commit()?;
        tracing::info!(version = index + 1, "applied schema migration");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_twice_is_noop() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        apply(&mut conn).unwrap();
        apply(&mut conn).unwrap();

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, MIGRATIONS.len() as i64);

        // Settings singleton row is seeded exactly once.
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
