// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vendaro rates`, `vendaro ship`, and `vendaro autoship` implementations.

use std::io::IsTerminal;
use std::time::Duration;

use colored::Colorize;
use vendaro_config::VendaroConfig;
use vendaro_core::VendaroError;
use vendaro_shipping::{CarrierClient, ShipmentService};
use vendaro_storage::Database;

async fn open_service(
    config: &VendaroConfig,
) -> Result<(Database, ShipmentService), VendaroError> {
    let db = Database::open(&config.storage.db_path).await?;
    let client = CarrierClient::new(
        &config.carrier.base_url,
        Duration::from_secs(config.carrier.timeout_secs),
    )?;
    let service = ShipmentService::new(db.clone(), client);
    Ok((db, service))
}

/// `vendaro rates --order <id>` - resolve courier rates for an order.
pub async fn rates(config: &VendaroConfig, order: i64, json: bool) -> Result<(), VendaroError> {
    let (db, service) = open_service(config).await?;
    let quote = service.get_rates(order).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&quote).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        if let Some(recommended) = quote.recommended_courier_id {
            println!("recommended courier: {recommended}");
        }
        for courier in &quote.couriers {
            println!(
                "  [{}] {} - {:.2} ({} days)",
                courier.courier_company_id,
                courier.courier_name,
                courier.rate,
                courier.estimated_delivery_days.as_deref().unwrap_or("?")
            );
        }
    }

    db.close().await?;
    Ok(())
}

/// `vendaro ship --order <id>` - create the carrier shipment for one order.
pub async fn ship(
    config: &VendaroConfig,
    order: i64,
    courier: Option<i64>,
    json: bool,
) -> Result<(), VendaroError> {
    let (db, service) = open_service(config).await?;
    let record = service.create_shipment(order, courier).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!(
            "order {}: carrier order {} / shipment {} [{}]",
            record.order_id,
            record.carrier_order_id,
            record.carrier_shipment_id,
            record.shipping_status
        );
        if let Some(awb) = &record.tracking_code {
            println!(
                "  tracking {awb} via {} (ETA {})",
                record.courier_name.as_deref().unwrap_or("?"),
                record.estimated_delivery.as_deref().unwrap_or("?")
            );
        }
    }

    db.close().await?;
    Ok(())
}

/// `vendaro autoship` - ship every eligible order, reporting per-order results.
pub async fn autoship(config: &VendaroConfig, json: bool) -> Result<(), VendaroError> {
    let (db, service) = open_service(config).await?;
    let summary = service.auto_ship_pending().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = std::io::stdout().is_terminal();
        println!(
            "autoship: {} attempted, {} shipped, {} failed",
            summary.attempted, summary.shipped, summary.failed
        );
        for outcome in &summary.outcomes {
            let (mark, detail) = match (&outcome.record, &outcome.error) {
                (Some(record), _) => (
                    "ok",
                    format!(
                        "{} [{}]",
                        record.tracking_code.as_deref().unwrap_or("no AWB yet"),
                        record.shipping_status
                    ),
                ),
                (None, Some(error)) => ("fail", format!("{} [{}]", error.message, error.code)),
                (None, None) => ("fail", "unknown".to_string()),
            };
            if use_color {
                let mark = if outcome.success {
                    mark.green()
                } else {
                    mark.red()
                };
                println!("  {mark} order {}: {detail}", outcome.order_id);
            } else {
                println!("  [{mark}] order {}: {detail}", outcome.order_id);
            }
        }
    }

    db.close().await?;
    Ok(())
}
