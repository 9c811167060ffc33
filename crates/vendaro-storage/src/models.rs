// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! Row structs mirror the table layouts; the `*Export` structs are the flat,
//! denormalized projections written to backup artifacts.

use serde::Serialize;

/// A marketplace account (buyer or seller).
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: String,
}

/// A catalog product listed by a seller.
///
/// Physical attributes are per unit; `None` means the seller never provided
/// them and package aggregation falls back to the carrier-safe floors.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
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
    pub created_at: String,
}

/// An order, including its shipment record columns.
///
/// `carrier_order_id` is assigned at most once; the storage layer enforces
/// this with a guarded UPDATE.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
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
    pub carrier_order_id: Option<String>,
    pub carrier_shipment_id: Option<String>,
    pub tracking_code: Option<String>,
    pub courier_name: Option<String>,
    pub estimated_delivery: Option<String>,
    pub shipping_status: String,
    pub created_at: String,
}

/// A line item on an order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

/// The marketplace settings singleton row.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub carrier_email: Option<String>,
    pub carrier_password: Option<String>,
    pub default_courier_id: Option<i64>,
    pub pickup_location: String,
    pub pickup_postcode: Option<String>,
    pub last_carrier_token: Option<String>,
    pub last_carrier_token_at: Option<String>,
}

// --- Backup export projections ---

/// Flat account row for the `accounts` backup artifact.
#[derive(Debug, Clone, Serialize)]
pub struct AccountExport {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: String,
}

/// Flat product row for the `catalog-items` backup artifact, with the
/// seller id resolved into a display name.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogExport {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub seller_name: String,
}

/// Flat order row for the `transactions` backup artifact, with the buyer
/// resolved into a display name and line items collapsed into a count.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionExport {
    pub id: i64,
    pub buyer_name: String,
    pub status: String,
    pub payment_method: String,
    pub subtotal: f64,
    pub item_count: i64,
    pub shipping_city: String,
    pub shipping_status: String,
    pub tracking_code: Option<String>,
    pub created_at: String,
}
