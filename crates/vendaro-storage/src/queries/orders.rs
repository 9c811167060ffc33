// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order queries, including the two-phase shipment record mutations.
//!
//! `record_carrier_order` is the idempotency guard: the UPDATE is predicated
//! on `carrier_order_id IS NULL`, so a second carrier-order creation for the
//! same order can never overwrite the first.

use rusqlite::params;
use vendaro_core::{ShippingStatus, VendaroError};

use crate::database::{map_tr_err, Database};
use crate::models::{Order, OrderItem, TransactionExport};

const ORDER_COLUMNS: &str = "id, buyer_id, status, payment_method, subtotal,
    shipping_name, shipping_address, shipping_city, shipping_state,
    shipping_postcode, shipping_phone, shipping_email,
    carrier_order_id, carrier_shipment_id, tracking_code, courier_name,
    estimated_delivery, shipping_status, created_at";

fn order_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        buyer_id: row.get(1)?,
        status: row.get(2)?,
        payment_method: row.get(3)?,
        subtotal: row.get(4)?,
        shipping_name: row.get(5)?,
        shipping_address: row.get(6)?,
        shipping_city: row.get(7)?,
        shipping_state: row.get(8)?,
        shipping_postcode: row.get(9)?,
        shipping_phone: row.get(10)?,
        shipping_email: row.get(11)?,
        carrier_order_id: row.get(12)?,
        carrier_shipment_id: row.get(13)?,
        tracking_code: row.get(14)?,
        courier_name: row.get(15)?,
        estimated_delivery: row.get(16)?,
        shipping_status: row.get(17)?,
        created_at: row.get(18)?,
    })
}

/// Parameters for inserting an order with its line items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: i64,
    pub status: String,
    pub payment_method: String,
    pub subtotal: f64,
    pub shipping_name: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_postcode: String,
    pub shipping_phone: Option<String>,
    pub shipping_email: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// A line item for [`NewOrder`].
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Insert an order and its line items in one transaction. Returns the order id.
pub async fn create(db: &Database, order: NewOrder) -> Result<i64, VendaroError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO orders
                 (buyer_id, status, payment_method, subtotal,
                  shipping_name, shipping_address, shipping_city, shipping_state,
                  shipping_postcode, shipping_phone, shipping_email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    order.buyer_id,
                    order.status,
                    order.payment_method,
                    order.subtotal,
                    order.shipping_name,
                    order.shipping_address,
                    order.shipping_city,
                    order.shipping_state,
                    order.shipping_postcode,
                    order.shipping_phone,
                    order.shipping_email,
                ],
            )?;
            let order_id = tx.last_insert_rowid();
            for item in &order.items {
                tx.execute(
                    "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![order_id, item.product_id, item.quantity, item.unit_price],
                )?;
            }
            tx.commit()?;
            Ok(order_id)
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch an order with its line items.
pub async fn get_with_items(
    db: &Database,
    id: i64,
) -> Result<Option<(Order, Vec<OrderItem>)>, VendaroError> {
    db.connection()
        .call(move |conn| {
            let order = {
                let mut stmt = conn
                    .prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))?;
                stmt.query_row(params![id], order_from_row)
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?
            };
            let Some(order) = order else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT id, order_id, product_id, quantity, unit_price
                 FROM order_items WHERE order_id = ?1 ORDER BY id",
            )?;
            let items = stmt
                .query_map(params![id], |row| {
                    Ok(OrderItem {
                        id: row.get(0)?,
                        order_id: row.get(1)?,
                        product_id: row.get(2)?,
                        quantity: row.get(3)?,
                        unit_price: row.get(4)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(Some((order, items)))
        })
        .await
        .map_err(map_tr_err)
}

/// Orders eligible for batch auto-shipping: confirmed, no carrier order yet,
/// and not cash-on-delivery. Ordered by id so batches process oldest first.
pub async fn list_shippable(db: &Database) -> Result<Vec<Order>, VendaroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders
                 WHERE status = 'confirmed'
                   AND carrier_order_id IS NULL
                   AND payment_method != 'cod'
                 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map([], order_from_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Phase one of the shipment record: attach the carrier's order and shipment
/// ids. Rejects the write if the order already carries a `carrier_order_id`.
pub async fn record_carrier_order(
    db: &Database,
    order_id: i64,
    carrier_order_id: &str,
    carrier_shipment_id: &str,
) -> Result<(), VendaroError> {
    let carrier_order_id = carrier_order_id.to_string();
    let carrier_shipment_id = carrier_shipment_id.to_string();
    let status = ShippingStatus::CarrierOrderCreated.to_string();

    let updated: usize = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE orders
                 SET carrier_order_id = ?1, carrier_shipment_id = ?2, shipping_status = ?3
                 WHERE id = ?4 AND carrier_order_id IS NULL",
                params![carrier_order_id, carrier_shipment_id, status, order_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;

    if updated == 1 {
        return Ok(());
    }

    // Distinguish "already shipped" from "no such order".
    match get_with_items(db, order_id).await? {
        Some(_) => Err(VendaroError::AlreadyShipped { order_id }),
        None => Err(VendaroError::NotFound(format!("order {order_id}"))),
    }
}

/// Phase two of the shipment record: tracking code, courier, and estimated
/// delivery, written once AWB assignment and pickup generation resolve.
pub async fn record_tracking(
    db: &Database,
    order_id: i64,
    tracking_code: &str,
    courier_name: Option<&str>,
    estimated_delivery: Option<&str>,
    status: ShippingStatus,
) -> Result<(), VendaroError> {
    let tracking_code = tracking_code.to_string();
    let courier_name = courier_name.map(str::to_string);
    let estimated_delivery = estimated_delivery.map(str::to_string);
    let status = status.to_string();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders
                 SET tracking_code = ?1, courier_name = ?2,
                     estimated_delivery = ?3, shipping_status = ?4
                 WHERE id = ?5",
                params![tracking_code, courier_name, estimated_delivery, status, order_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Advance only the shipping status (tracking updates after dispatch).
pub async fn set_shipping_status(
    db: &Database,
    order_id: i64,
    status: ShippingStatus,
) -> Result<(), VendaroError> {
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET shipping_status = ?1 WHERE id = ?2",
                params![status, order_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Full transactions projection for the backup exporter, with the buyer
/// resolved into a display name and items collapsed into a count.
pub async fn list_for_export(db: &Database) -> Result<Vec<TransactionExport>, VendaroError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT o.id, u.full_name, o.status, o.payment_method, o.subtotal,
                        COUNT(oi.id), o.shipping_city, o.shipping_status,
                        o.tracking_code, o.created_at
                 FROM orders o
                 JOIN users u ON u.id = o.buyer_id
                 LEFT JOIN order_items oi ON oi.order_id = o.id
                 GROUP BY o.id
                 ORDER BY o.id",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(TransactionExport {
                        id: row.get(0)?,
                        buyer_name: row.get(1)?,
                        status: row.get(2)?,
                        payment_method: row.get(3)?,
                        subtotal: row.get(4)?,
                        item_count: row.get(5)?,
                        shipping_city: row.get(6)?,
                        shipping_status: row.get(7)?,
                        tracking_code: row.get(8)?,
                        created_at: row.get(9)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}
