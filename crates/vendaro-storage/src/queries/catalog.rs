// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog queries: product lookup and the catalog-items export projection.

use rusqlite::params;
use vendaro_core::VendaroError;

use crate::database::{map_tr_err, Database};
use crate::models::{CatalogExport, Product};

/// Parameters for inserting a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub seller_id: i64,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub weight_kg: Option<f64>,
    pub length_cm: Option<f64>,
    pub breadth_cm: Option<f64>,
    pub height_cm: Option<f64>,
}

/// Insert a product. Returns the new row id.
pub async fn create(db: &Database, product: NewProduct) -> Result<i64, VendaroError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products
                 (seller_id, name, sku, category, price, stock,
                  weight_kg, length_cm, breadth_cm, height_cm)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    product.seller_id,
                    product.name,
                    product.sku,
                    product.category,
                    product.price,
                    product.stock,
                    product.weight_kg,
                    product.length_cm,
                    product.breadth_cm,
                    product.height_cm,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the products referenced by an order's line items.
pub async fn for_order(db: &Database, order_id: i64) -> Result<Vec<Product>, VendaroError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.seller_id, p.name, p.sku, p.category, p.price, p.stock,
                        p.weight_kg, p.length_cm, p.breadth_cm, p.height_cm, p.created_at
                 FROM products p
                 JOIN order_items oi ON oi.product_id = p.id
                 WHERE oi.order_id = ?1
                 ORDER BY oi.id",
            )?;
            let rows = stmt
                .query_map(params![order_id], |row| {
                    Ok(Product {
                        id: row.get(0)?,
                        seller_id: row.get(1)?,
                        name: row.get(2)?,
                        sku: row.get(3)?,
                        category: row.get(4)?,
                        price: row.get(5)?,
                        stock: row.get(6)?,
                        weight_kg: row.get(7)?,
                        length_cm: row.get(8)?,
                        breadth_cm: row.get(9)?,
                        height_cm: row.get(10)?,
                        created_at: row.get(11)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Full catalog projection for the backup exporter, with the seller id
/// denormalized into a display name, ordered by id.
pub async fn list_for_export(db: &Database) -> Result<Vec<CatalogExport>, VendaroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.name, p.sku, p.category, p.price, p.stock, u.full_name
                 FROM products p
                 JOIN users u ON u.id = p.seller_id
                 ORDER BY p.id",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(CatalogExport {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        sku: row.get(2)?,
                        category: row.get(3)?,
                        price: row.get(4)?,
                        stock: row.get(5)?,
                        seller_name: row.get(6)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::accounts;
    use tempfile::tempdir;

    fn sample(seller_id: i64, sku: &str) -> NewProduct {
        NewProduct {
            seller_id,
            name: "Ceramic Mug".into(),
            sku: sku.into(),
            category: Some("kitchen".into()),
            price: 349.0,
            stock: 12,
            weight_kg: Some(0.4),
            length_cm: Some(12.0),
            breadth_cm: Some(9.0),
            height_cm: Some(10.0),
        }
    }

    #[tokio::test]
    async fn export_resolves_seller_name() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        let seller = accounts::create(&db, "maya", "maya@example.com", "Maya Iyer", None, "seller")
            .await
            .unwrap();
        create(&db, sample(seller, "MUG-01")).await.unwrap();
        create(&db, sample(seller, "MUG-02")).await.unwrap();

        let rows = list_for_export(&db).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].seller_name, "Maya Iyer");
        db.close().await.unwrap();
    }
}
