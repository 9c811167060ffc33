// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External carrier shipment synchronization for the Vendaro marketplace.
//!
//! Turns a confirmed order into a carrier shipment: fresh-token
//! authentication, rate shopping, shipment creation, AWB assignment, and
//! pickup generation, with defensive handling of a flaky third-party API.
//! Carrier ids are persisted the moment the carrier order exists, so a
//! partial failure can never strand an untracked carrier-side order.

pub mod client;
pub mod rates;
pub mod shipment;
pub mod types;

pub use client::CarrierClient;
pub use rates::{postprocess, RateQuote, DEFAULT_ETD_DAYS, RATE_FLOOR};
pub use shipment::{
    package_attributes, AutoShipSummary, PackageAttributes, ShipOutcome, ShipmentRecord,
    ShipmentService, MIN_DIMENSION_CM, MIN_WEIGHT_KG,
};
pub use types::{AuthToken, CarrierOrderPayload, CourierOption, RateQuery};
