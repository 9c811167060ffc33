// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-processing of raw serviceability responses into a usable quote list.

use serde::Serialize;
use tracing::debug;

use crate::types::{CourierOption, ServiceabilityData};

/// Minimum billable rate. The carrier occasionally quotes zero or near-zero
/// for serviceable couriers; clamping prevents that being treated as free
/// shipping downstream.
pub const RATE_FLOOR: f64 = 20.0;

/// Estimated-delivery string used when the carrier omits one.
pub const DEFAULT_ETD_DAYS: &str = "5-7";

/// Filtered, clamped, and sorted courier options for one route.
#[derive(Debug, Clone, Serialize)]
pub struct RateQuote {
    /// Usable couriers, ascending by rate.
    pub couriers: Vec<CourierOption>,
    /// The carrier's own recommendation, passed through unmodified.
    pub recommended_courier_id: Option<i64>,
}

/// Post-process a raw serviceability response.
///
/// Drops couriers the carrier flags as blocked and same-city/local-only
/// options (not suitable for marketplace fulfilment), clamps each quoted
/// rate to [`RATE_FLOOR`], fills in [`DEFAULT_ETD_DAYS`] where the estimate
/// is missing, and sorts ascending by rate.
pub fn postprocess(data: ServiceabilityData) -> RateQuote {
    let total = data.available_courier_companies.len();
    let mut couriers: Vec<CourierOption> = data
        .available_courier_companies
        .into_iter()
        .filter(|courier| !courier.blocked && !is_same_city(&courier.courier_name))
        .map(|mut courier| {
            if courier.rate < RATE_FLOOR {
                courier.rate = RATE_FLOOR;
            }
            let missing_etd = courier
                .estimated_delivery_days
                .as_deref()
                .is_none_or(str::is_empty);
            if missing_etd {
                courier.estimated_delivery_days = Some(DEFAULT_ETD_DAYS.to_string());
            }
            courier
        })
        .collect();

    couriers.sort_by(|a, b| a.rate.total_cmp(&b.rate));
    debug!(total, usable = couriers.len(), "serviceability post-processed");

    RateQuote {
        couriers,
        recommended_courier_id: data.recommended_courier_company_id,
    }
}

/// Same-city couriers only deliver within the pickup city.
fn is_same_city(courier_name: &str) -> bool {
    courier_name.to_lowercase().contains("local")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: i64, name: &str, rate: f64, blocked: bool) -> CourierOption {
        CourierOption {
            courier_company_id: id,
            courier_name: name.into(),
            rate,
            estimated_delivery_days: None,
            blocked,
        }
    }

    #[test]
    fn blocked_and_local_couriers_are_dropped() {
        let quote = postprocess(ServiceabilityData {
            available_courier_companies: vec![
                option(1, "BlueDart Surface", 91.0, false),
                option(2, "Quick Local Delivery", 30.0, false),
                option(3, "Delhivery Air", 140.0, true),
            ],
            recommended_courier_company_id: Some(3),
        });

        assert_eq!(quote.couriers.len(), 1);
        assert_eq!(quote.couriers[0].courier_company_id, 1);
        // Recommendation is passed through even when that courier was filtered.
        assert_eq!(quote.recommended_courier_id, Some(3));
    }

    #[test]
    fn rates_are_clamped_to_the_floor() {
        let quote = postprocess(ServiceabilityData {
            available_courier_companies: vec![
                option(1, "Ekart", 0.0, false),
                option(2, "XpressBees", 5.5, false),
                option(3, "BlueDart", 91.0, false),
            ],
            recommended_courier_company_id: None,
        });

        assert_eq!(quote.couriers[0].rate, RATE_FLOOR);
        assert_eq!(quote.couriers[1].rate, RATE_FLOOR);
        assert_eq!(quote.couriers[2].rate, 91.0);
    }

    #[test]
    fn missing_delivery_estimate_gets_default() {
        let mut with_etd = option(1, "BlueDart", 91.0, false);
        with_etd.estimated_delivery_days = Some("2-3".into());
        let mut empty_etd = option(2, "Ekart", 60.0, false);
        empty_etd.estimated_delivery_days = Some(String::new());

        let quote = postprocess(ServiceabilityData {
            available_courier_companies: vec![with_etd, empty_etd, option(3, "XB", 70.0, false)],
            recommended_courier_company_id: None,
        });

        let by_id = |id: i64| {
            quote
                .couriers
                .iter()
                .find(|c| c.courier_company_id == id)
                .unwrap()
        };
        assert_eq!(by_id(1).estimated_delivery_days.as_deref(), Some("2-3"));
        assert_eq!(by_id(2).estimated_delivery_days.as_deref(), Some(DEFAULT_ETD_DAYS));
        assert_eq!(by_id(3).estimated_delivery_days.as_deref(), Some(DEFAULT_ETD_DAYS));
    }

    #[test]
    fn couriers_sort_ascending_by_rate() {
        let quote = postprocess(ServiceabilityData {
            available_courier_companies: vec![
                option(1, "Pricey", 250.0, false),
                option(2, "Cheap", 45.0, false),
                option(3, "Middle", 120.0, false),
            ],
            recommended_courier_company_id: None,
        });

        let rates: Vec<f64> = quote.couriers.iter().map(|c| c.rate).collect();
        assert_eq!(rates, vec![45.0, 120.0, 250.0]);
    }
}
