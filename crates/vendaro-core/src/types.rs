// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Vendaro workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Shipment progress of an order against the external carrier.
///
/// Progression: `Unshipped` → `CarrierOrderCreated` → `AwbAssigned` →
/// `PickupRequested` → `Tracked`. The record is only ever advanced by
/// status-tracking updates; a second carrier-order creation is rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ShippingStatus {
    Unshipped,
    CarrierOrderCreated,
    AwbAssigned,
    PickupRequested,
    Tracked,
}

/// Payment method recorded on an order. Cash-on-delivery orders are excluded
/// from batch auto-shipping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Prepaid,
    Cod,
}

impl PaymentMethod {
    /// The label the carrier API expects in order payloads.
    pub fn carrier_label(&self) -> &'static str {
        match self {
            PaymentMethod::Prepaid => "Prepaid",
            PaymentMethod::Cod => "COD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn shipping_status_round_trips_kebab_case() {
        let all = [
            ShippingStatus::Unshipped,
            ShippingStatus::CarrierOrderCreated,
            ShippingStatus::AwbAssigned,
            ShippingStatus::PickupRequested,
            ShippingStatus::Tracked,
        ];
        for status in all {
            let s = status.to_string();
            assert_eq!(ShippingStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(
            ShippingStatus::CarrierOrderCreated.to_string(),
            "carrier-order-created"
        );
    }

    #[test]
    fn payment_method_carrier_labels() {
        assert_eq!(PaymentMethod::Prepaid.carrier_label(), "Prepaid");
        assert_eq!(PaymentMethod::Cod.carrier_label(), "COD");
        assert_eq!(PaymentMethod::from_str("cod").unwrap(), PaymentMethod::Cod);
    }
}
