// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipment orchestration: rate lookup, carrier order creation, AWB
//! assignment, pickup generation, and batch auto-shipping.
//!
//! Persistence is two-phase. Carrier ids land the moment the carrier order
//! exists, so a failure later in the sequence can never strand an untracked
//! carrier-side order; tracking fields land once AWB and pickup resolve. The
//! `carrier_order_id IS NULL` guard in storage makes re-creation impossible.

use serde::Serialize;
use tracing::{error, info, warn};
use vendaro_core::{ErrorBody, ShippingStatus, VendaroError};
use vendaro_storage::queries::{accounts, catalog, orders, settings};
use vendaro_storage::{Database, Order, OrderItem, Product, Settings};

use crate::client::CarrierClient;
use crate::rates::{postprocess, RateQuote};
use crate::types::{AuthToken, CarrierOrderPayload, RateQuery};

/// Floor for each package dimension sent to the carrier, in centimetres.
/// Degenerate (zero or missing) dimensions make carriers reject the request.
pub const MIN_DIMENSION_CM: f64 = 10.0;

/// Floor for the aggregate package weight, in kilograms.
pub const MIN_WEIGHT_KG: f64 = 0.5;

/// Aggregate physical attributes of one order's package.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PackageAttributes {
    pub weight_kg: f64,
    pub length_cm: f64,
    pub breadth_cm: f64,
    pub height_cm: f64,
}

/// Aggregate a package from an order's line items.
///
/// Dimensions take the maximum of each axis across items (items ship in one
/// box); weight sums `unit weight x quantity`. Both are floored so a missing
/// or zero product attribute never produces a degenerate carrier request.
pub fn package_attributes(items: &[OrderItem], products: &[Product]) -> PackageAttributes {
    let mut weight: f64 = 0.0;
    let mut length: f64 = 0.0;
    let mut breadth: f64 = 0.0;
    let mut height: f64 = 0.0;

    for (item, product) in items.iter().zip(products) {
        weight += product.weight_kg.unwrap_or(0.0) * item.quantity as f64;
        length = length.max(product.length_cm.unwrap_or(0.0));
        breadth = breadth.max(product.breadth_cm.unwrap_or(0.0));
        height = height.max(product.height_cm.unwrap_or(0.0));
    }

    PackageAttributes {
        weight_kg: weight.max(MIN_WEIGHT_KG),
        length_cm: length.max(MIN_DIMENSION_CM),
        breadth_cm: breadth.max(MIN_DIMENSION_CM),
        height_cm: height.max(MIN_DIMENSION_CM),
    }
}

/// The shipment fields recorded on an order after synchronization.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentRecord {
    pub order_id: i64,
    pub carrier_order_id: String,
    pub carrier_shipment_id: String,
    pub tracking_code: Option<String>,
    pub courier_name: Option<String>,
    pub estimated_delivery: Option<String>,
    pub shipping_status: ShippingStatus,
}

/// Per-order outcome of a batch auto-ship run.
#[derive(Debug, Clone, Serialize)]
pub struct ShipOutcome {
    pub order_id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ShipmentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Summary of a batch auto-ship run.
#[derive(Debug, Clone, Serialize)]
pub struct AutoShipSummary {
    pub attempted: usize,
    pub shipped: usize,
    pub failed: usize,
    pub outcomes: Vec<ShipOutcome>,
}

/// Orchestrates order-to-shipment synchronization against the carrier.
#[derive(Clone)]
pub struct ShipmentService {
    db: Database,
    client: CarrierClient,
}

impl ShipmentService {
    pub fn new(db: Database, client: CarrierClient) -> Self {
        Self { db, client }
    }

    /// Fetch a fresh carrier token using the stored credentials.
    ///
    /// The token is persisted to settings for observability only; the next
    /// operation will authenticate again regardless.
    async fn fresh_token(&self) -> Result<(AuthToken, Settings), VendaroError> {
        let stored = settings::get(&self.db).await?;
        let (Some(email), Some(password)) = (
            stored.carrier_email.as_deref(),
            stored.carrier_password.as_deref(),
        ) else {
            return Err(VendaroError::Config(
                "carrier credentials are not configured in marketplace settings".into(),
            ));
        };

        let token = self.client.authenticate(email, password).await?;
        if let Err(e) = settings::record_carrier_token(&self.db, &token.value).await {
            warn!(error = %e, "failed to record carrier token; continuing");
        }
        Ok((token, stored))
    }

    /// Resolve shipping rates for one order.
    pub async fn get_rates(&self, order_id: i64) -> Result<RateQuote, VendaroError> {
        let (order, items) = self.load_order(order_id).await?;
        let products = catalog::for_order(&self.db, order_id).await?;
        let (token, stored) = self.fresh_token().await?;

        let pickup_postcode = stored.pickup_postcode.ok_or_else(|| {
            VendaroError::Config("pickup postcode is not configured in marketplace settings".into())
        })?;

        let package = package_attributes(&items, &products);
        let query = RateQuery {
            pickup_postcode,
            delivery_postcode: order.shipping_postcode.clone(),
            cod: order.payment_method == "cod",
            weight_kg: package.weight_kg,
            length_cm: package.length_cm,
            breadth_cm: package.breadth_cm,
            height_cm: package.height_cm,
            declared_value: order.subtotal,
        };

        let data = self.client.get_serviceability(&token, &query).await?;
        Ok(postprocess(data))
    }

    /// Create the carrier shipment for a confirmed order.
    ///
    /// Rejected up front if the order already carries a `carrier_order_id`.
    /// When a courier is chosen (explicitly or via the default-courier
    /// setting), AWB assignment and pickup generation follow immediately;
    /// without one, the shipment stops at `carrier-order-created` for a
    /// later courier choice.
    pub async fn create_shipment(
        &self,
        order_id: i64,
        courier_id: Option<i64>,
    ) -> Result<ShipmentRecord, VendaroError> {
        let (order, items) = self.load_order(order_id).await?;
        if order.carrier_order_id.is_some() {
            return Err(VendaroError::AlreadyShipped { order_id });
        }

        let buyer = accounts::get(&self.db, order.buyer_id)
            .await?
            .ok_or_else(|| VendaroError::NotFound(format!("buyer {}", order.buyer_id)))?;
        let products = catalog::for_order(&self.db, order_id).await?;
        let (token, stored) = self.fresh_token().await?;

        let package = package_attributes(&items, &products);
        let payload =
            CarrierOrderPayload::from_order(&order, &buyer, &items, &products, &stored, &package);

        let created = self.client.create_order(&token, &payload).await?;
        let carrier_order_id = created.order_id.to_string();
        let carrier_shipment_id = created.shipment_id.to_string();

        // Phase one: the carrier-side order now exists; persist its ids
        // before anything else can fail.
        orders::record_carrier_order(&self.db, order_id, &carrier_order_id, &carrier_shipment_id)
            .await?;
        info!(
            order_id,
            carrier_order_id = %carrier_order_id,
            carrier_shipment_id = %carrier_shipment_id,
            "carrier order created"
        );

        let mut record = ShipmentRecord {
            order_id,
            carrier_order_id: carrier_order_id.clone(),
            carrier_shipment_id: carrier_shipment_id.clone(),
            tracking_code: None,
            courier_name: None,
            estimated_delivery: None,
            shipping_status: ShippingStatus::CarrierOrderCreated,
        };

        let Some(courier) = courier_id.or(stored.default_courier_id) else {
            info!(order_id, "no courier chosen; shipment left at carrier-order-created");
            return Ok(record);
        };

        let awb = match self.client.assign_awb(&token, created.shipment_id, courier).await {
            Ok(awb) => awb,
            Err(e) => {
                error!(
                    order_id,
                    carrier_order_id = %carrier_order_id,
                    carrier_shipment_id = %carrier_shipment_id,
                    error = %e,
                    "AWB assignment failed after carrier order creation; manual follow-up required"
                );
                return Err(e);
            }
        };

        orders::record_tracking(
            &self.db,
            order_id,
            &awb.awb_code,
            awb.courier_name.as_deref(),
            awb.expected_delivery_date.as_deref(),
            ShippingStatus::AwbAssigned,
        )
        .await?;
        record.tracking_code = Some(awb.awb_code.clone());
        record.courier_name = awb.courier_name.clone();
        record.estimated_delivery = awb.expected_delivery_date.clone();
        record.shipping_status = ShippingStatus::AwbAssigned;
        info!(order_id, awb = %awb.awb_code, "AWB assigned");

        match self.client.generate_pickup(&token, created.shipment_id).await {
            Ok(ack) => {
                if ack.already_queued {
                    info!(order_id, "pickup was already queued by a prior attempt");
                }
                orders::set_shipping_status(&self.db, order_id, ShippingStatus::PickupRequested)
                    .await?;
                record.shipping_status = ShippingStatus::PickupRequested;
            }
            Err(e) => {
                error!(
                    order_id,
                    carrier_shipment_id = %carrier_shipment_id,
                    awb = %awb.awb_code,
                    error = %e,
                    "pickup generation failed after AWB assignment; manual follow-up required"
                );
                return Err(e);
            }
        }

        Ok(record)
    }

    /// Ship every eligible order, independently.
    ///
    /// One order's failure never blocks another's processing; each order
    /// gets its own outcome and the failed ones stay eligible for a future
    /// run (unless their carrier order was already created).
    pub async fn auto_ship_pending(&self) -> Result<AutoShipSummary, VendaroError> {
        let candidates = orders::list_shippable(&self.db).await?;
        info!(candidates = candidates.len(), "auto-ship batch starting");

        let mut outcomes = Vec::with_capacity(candidates.len());
        let mut shipped = 0usize;
        for order in &candidates {
            match self.create_shipment(order.id, None).await {
                Ok(record) => {
                    shipped += 1;
                    outcomes.push(ShipOutcome {
                        order_id: order.id,
                        success: true,
                        record: Some(record),
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(order_id = order.id, error = %e, "auto-ship failed; continuing batch");
                    outcomes.push(ShipOutcome {
                        order_id: order.id,
                        success: false,
                        record: None,
                        error: Some(e.body()),
                    });
                }
            }
        }

        Ok(AutoShipSummary {
            attempted: candidates.len(),
            shipped,
            failed: candidates.len() - shipped,
            outcomes,
        })
    }

    async fn load_order(&self, order_id: i64) -> Result<(Order, Vec<OrderItem>), VendaroError> {
        orders::get_with_items(&self.db, order_id)
            .await?
            .ok_or_else(|| VendaroError::NotFound(format!("order {order_id}")))
    }
}
