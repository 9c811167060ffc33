// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vendaro backup` subcommand implementations.

use vendaro_backup::{BackupExporter, ExportOutcome, MirrorClient, MirrorStatus};
use vendaro_config::VendaroConfig;
use vendaro_core::VendaroError;
use vendaro_storage::Database;

/// Open storage and build the exporter from config.
pub async fn open_exporter(
    config: &VendaroConfig,
) -> Result<(Database, BackupExporter), VendaroError> {
    let db = Database::open(&config.storage.db_path).await?;

    let mirror = match (&config.backup.mirror_endpoint, &config.backup.mirror_bucket) {
        (Some(endpoint), Some(bucket)) => Some(MirrorClient::new(
            endpoint,
            bucket,
            config.backup.mirror_token.as_deref(),
        )?),
        _ => None,
    };

    let exporter = BackupExporter::new(db.clone(), config.backup.directory.clone(), mirror);
    Ok((db, exporter))
}

/// `vendaro backup run` - run a full export immediately.
pub async fn run(config: &VendaroConfig, json: bool) -> Result<(), VendaroError> {
    let (db, exporter) = open_exporter(config).await?;
    let outcomes = exporter.export_all().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcomes).unwrap_or_else(|_| "[]".to_string())
        );
    } else {
        for outcome in &outcomes {
            println!(
                "{}: {} rows -> {} ({})",
                outcome.entity,
                outcome.rows,
                outcome.path.display(),
                describe_mirror(outcome)
            );
        }
    }

    db.close().await?;
    Ok(())
}

/// `vendaro backup list` - list artifacts grouped by entity.
pub async fn list(config: &VendaroConfig, json: bool) -> Result<(), VendaroError> {
    let (db, exporter) = open_exporter(config).await?;
    let grouped = exporter.list_artifacts()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&grouped).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        for (entity, files) in &grouped {
            println!("{entity} ({}):", files.len());
            for file in files {
                println!("  {file}");
            }
        }
    }

    db.close().await?;
    Ok(())
}

/// `vendaro backup path <file>` - resolve one artifact to a full path.
pub async fn path(config: &VendaroConfig, file: &str) -> Result<(), VendaroError> {
    let (db, exporter) = open_exporter(config).await?;
    let path = exporter.artifact_path(file)?;
    println!("{}", path.display());
    db.close().await?;
    Ok(())
}

/// `vendaro backup delete <file>` - delete one artifact.
pub async fn delete(config: &VendaroConfig, file: &str) -> Result<(), VendaroError> {
    let (db, exporter) = open_exporter(config).await?;
    exporter.delete_artifact(file)?;
    println!("deleted {file}");
    db.close().await?;
    Ok(())
}

fn describe_mirror(outcome: &ExportOutcome) -> String {
    match &outcome.mirror {
        MirrorStatus::Uploaded(key) => format!("mirrored to {key}"),
        MirrorStatus::Disabled => "mirror disabled".to_string(),
        MirrorStatus::Failed(reason) => format!("local only, mirror failed: {reason}"),
    }
}
