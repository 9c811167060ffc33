// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vendaro daemon` - long-running process that keeps the nightly backup
//! armed.
//!
//! Schedule state is in-memory only, so the daemon re-arms unconditionally
//! on every boot. Run a single instance: two daemons would each fire the
//! daily backup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use vendaro_backup::BackupExporter;
use vendaro_config::VendaroConfig;
use vendaro_core::VendaroError;
use vendaro_scheduler::{DailyScheduler, Job};

use crate::backup::open_exporter;

/// The scheduler job body: a full export of every entity.
struct NightlyBackup {
    exporter: BackupExporter,
}

#[async_trait]
impl Job for NightlyBackup {
    fn name(&self) -> &str {
        "nightly-backup"
    }

    async fn run(&self) -> Result<(), VendaroError> {
        let outcomes = self.exporter.export_all().await?;
        for outcome in &outcomes {
            info!(
                entity = %outcome.entity,
                rows = outcome.rows,
                path = %outcome.path.display(),
                mirror = ?outcome.mirror,
                "nightly backup artifact"
            );
        }
        Ok(())
    }
}

/// Run the daemon until interrupted.
pub async fn run(config: &VendaroConfig) -> Result<(), VendaroError> {
    let (db, exporter) = open_exporter(config).await?;

    let scheduler = DailyScheduler::new(
        Arc::new(NightlyBackup { exporter }),
        Duration::from_secs(config.backup.retry_delay_mins * 60),
    );
    let next = scheduler.schedule(config.backup.hour, config.backup.minute)?;
    info!(next_run = %next, "nightly backup armed");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| VendaroError::Internal(format!("failed to listen for shutdown: {e}")))?;
    info!("shutdown signal received");

    scheduler.cancel();
    db.close().await?;
    Ok(())
}
