// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the carrier API, plus the typed order payload builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vendaro_core::PaymentMethod;
use vendaro_storage::{Order, OrderItem, Product, Settings, User};

use crate::shipment::PackageAttributes;

/// Credentials payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// A freshly fetched carrier auth token.
///
/// Always short-lived by policy: the carrier gives no reliable expiry
/// signal, so every operation fetches a new one rather than trusting a
/// cached value. `obtained_at` exists for observability only.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub value: String,
    pub obtained_at: DateTime<Utc>,
}

/// One courier offering from the serviceability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierOption {
    pub courier_company_id: i64,
    pub courier_name: String,
    pub rate: f64,
    #[serde(default)]
    pub estimated_delivery_days: Option<String>,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceabilityData {
    #[serde(default)]
    pub available_courier_companies: Vec<CourierOption>,
    #[serde(default)]
    pub recommended_courier_company_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceabilityResponse {
    pub data: ServiceabilityData,
}

/// Query parameters for `GET /courier/serviceability`.
#[derive(Debug, Clone)]
pub struct RateQuery {
    pub pickup_postcode: String,
    pub delivery_postcode: String,
    pub cod: bool,
    pub weight_kg: f64,
    pub length_cm: f64,
    pub breadth_cm: f64,
    pub height_cm: f64,
    pub declared_value: f64,
}

/// A line item inside [`CarrierOrderPayload`].
#[derive(Debug, Clone, Serialize)]
pub struct PayloadItem {
    pub name: String,
    pub sku: String,
    pub units: i64,
    pub selling_price: f64,
}

/// The carrier's order-creation payload.
///
/// Built in one place by [`CarrierOrderPayload::from_order`] so the
/// defaulting rules are stated once instead of being assembled ad hoc at
/// call sites.
#[derive(Debug, Clone, Serialize)]
pub struct CarrierOrderPayload {
    pub order_id: String,
    pub order_date: String,
    pub pickup_location: String,
    pub billing_customer_name: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_pincode: String,
    pub billing_phone: String,
    pub billing_email: String,
    pub shipping_is_billing: bool,
    pub order_items: Vec<PayloadItem>,
    pub payment_method: String,
    pub sub_total: f64,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    pub weight: f64,
}

impl CarrierOrderPayload {
    /// Build the carrier payload from local records.
    ///
    /// Defaulting rules:
    /// - billing address is the order's shipping address (`shipping_is_billing`)
    /// - phone falls back from the order to the buyer's account, then empty
    /// - email falls back from the order to the buyer's account email
    /// - `order_date` is the date portion of the order's creation timestamp
    /// - package dimensions and weight come pre-aggregated with floors applied
    pub fn from_order(
        order: &Order,
        buyer: &User,
        items: &[OrderItem],
        products: &[Product],
        settings: &Settings,
        package: &PackageAttributes,
    ) -> Self {
        let payment_method = order
            .payment_method
            .parse::<PaymentMethod>()
            .unwrap_or(PaymentMethod::Prepaid)
            .carrier_label()
            .to_string();

        let order_items = items
            .iter()
            .zip(products)
            .map(|(item, product)| PayloadItem {
                name: product.name.clone(),
                sku: product.sku.clone(),
                units: item.quantity,
                selling_price: item.unit_price,
            })
            .collect();

        Self {
            order_id: order.id.to_string(),
            order_date: order
                .created_at
                .get(..10)
                .unwrap_or(&order.created_at)
                .to_string(),
            pickup_location: settings.pickup_location.clone(),
            billing_customer_name: order.shipping_name.clone(),
            billing_address: order.shipping_address.clone(),
            billing_city: order.shipping_city.clone(),
            billing_state: order.shipping_state.clone(),
            billing_pincode: order.shipping_postcode.clone(),
            billing_phone: order
                .shipping_phone
                .clone()
                .or_else(|| buyer.phone.clone())
                .unwrap_or_default(),
            billing_email: order
                .shipping_email
                .clone()
                .unwrap_or_else(|| buyer.email.clone()),
            shipping_is_billing: true,
            order_items,
            payment_method,
            sub_total: order.subtotal,
            length: package.length_cm,
            breadth: package.breadth_cm,
            height: package.height_cm,
            weight: package.weight_kg,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: i64,
    pub shipment_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignAwbRequest {
    pub shipment_id: i64,
    pub courier_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignAwbResponse {
    pub awb_code: String,
    #[serde(default)]
    pub courier_name: Option<String>,
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupRequest {
    pub shipment_id: i64,
}

/// Acknowledgement of a pickup-generation call.
///
/// `already_queued` marks the carrier's "shipment already queued for pickup"
/// response, which is the desired end state and therefore a success.
#[derive(Debug, Clone)]
pub struct PickupAck {
    pub already_queued: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error envelope the carrier returns on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierErrorBody {
    #[serde(default)]
    pub message: String,
}
