// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point-in-time CSV exports of the marketplace entity collections.
//!
//! `export_all` runs entities in a fixed order and aborts on the first
//! failure, with no partial-success suppression; the error propagates to
//! whatever invoked it (scheduler or manual trigger). Mirroring, by
//! contrast, never fails an export: its outcome is carried in the result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use vendaro_core::VendaroError;
use vendaro_storage::queries::{accounts, catalog, orders};
use vendaro_storage::Database;

use crate::artifacts;
use crate::entity::ExportEntity;
use crate::mirror::MirrorClient;

/// What happened to the remote copy of an artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum MirrorStatus {
    /// Uploaded under this object key.
    Uploaded(String),
    /// No mirror endpoint configured.
    Disabled,
    /// Upload failed; the local artifact is still valid.
    Failed(String),
}

/// Result of exporting one entity collection.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub entity: ExportEntity,
    pub path: PathBuf,
    pub rows: usize,
    pub mirror: MirrorStatus,
}

/// Produces immutable CSV artifacts from the primary store.
#[derive(Clone)]
pub struct BackupExporter {
    db: Database,
    directory: PathBuf,
    mirror: Option<MirrorClient>,
}

impl BackupExporter {
    pub fn new(
        db: Database,
        directory: impl Into<PathBuf>,
        mirror: Option<MirrorClient>,
    ) -> Self {
        Self {
            db,
            directory: directory.into(),
            mirror,
        }
    }

    /// The directory artifacts are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Export one entity collection to a new CSV artifact.
    ///
    /// The artifact is written once and never modified. After a successful
    /// local write the artifact is mirrored best-effort; mirror failures are
    /// logged and reported in the outcome, never propagated.
    pub async fn export_entity(
        &self,
        entity: ExportEntity,
    ) -> Result<ExportOutcome, VendaroError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| VendaroError::Storage {
            source: Box::new(e),
        })?;

        let filename = artifact_filename(entity, Utc::now());
        let path = self.directory.join(&filename);

        let rows = match entity {
            ExportEntity::Accounts => {
                write_csv(&path, &accounts::list_for_export(&self.db).await?)?
            }
            ExportEntity::CatalogItems => {
                write_csv(&path, &catalog::list_for_export(&self.db).await?)?
            }
            ExportEntity::Transactions => {
                write_csv(&path, &orders::list_for_export(&self.db).await?)?
            }
        };
        info!(entity = %entity, rows, file = %filename, "backup artifact written");

        let mirror = self.mirror_artifact(&path, &filename).await;

        Ok(ExportOutcome {
            entity,
            path,
            rows,
            mirror,
        })
    }

    /// Export every supported entity, sequentially and in fixed order.
    ///
    /// A failure aborts the whole run: later entities are not attempted and
    /// the error propagates to the caller.
    pub async fn export_all(&self) -> Result<Vec<ExportOutcome>, VendaroError> {
        let mut outcomes = Vec::with_capacity(ExportEntity::ALL.len());
        for entity in ExportEntity::ALL {
            outcomes.push(self.export_entity(entity).await?);
        }
        Ok(outcomes)
    }

    /// Existing artifacts grouped by entity prefix.
    pub fn list_artifacts(&self) -> Result<BTreeMap<String, Vec<String>>, VendaroError> {
        artifacts::list(&self.directory)
    }

    /// Resolve an artifact name to its path, after allow-list validation.
    pub fn artifact_path(&self, name: &str) -> Result<PathBuf, VendaroError> {
        artifacts::resolve(&self.directory, name)
    }

    /// Delete an artifact, after allow-list validation.
    pub fn delete_artifact(&self, name: &str) -> Result<(), VendaroError> {
        artifacts::delete(&self.directory, name)
    }

    async fn mirror_artifact(&self, path: &Path, filename: &str) -> MirrorStatus {
        let Some(client) = &self.mirror else {
            return MirrorStatus::Disabled;
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %filename, error = %e, "mirror skipped: artifact unreadable");
                return MirrorStatus::Failed(e.to_string());
            }
        };

        let date = Utc::now().format("%Y-%m-%d").to_string();
        match client.upload(&date, filename, bytes).await {
            Ok(key) => {
                info!(file = %filename, key = %key, "artifact mirrored");
                MirrorStatus::Uploaded(key)
            }
            Err(e) => {
                warn!(file = %filename, error = %e, "mirror upload failed; keeping local artifact");
                MirrorStatus::Failed(e.to_string())
            }
        }
    }
}

/// Build a collision-resistant artifact filename.
///
/// Millisecond-precision timestamp plus a random suffix, so two exports of
/// the same entity in the same second cannot interleave on one file. Colons
/// and dots are avoided to keep names filesystem-safe everywhere.
fn artifact_filename(entity: ExportEntity, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%dT%H-%M-%S-%3f");
    let suffix: u16 = rand::random();
    format!("{}-backup-{stamp}-{suffix:04x}.csv", entity.prefix())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize, VendaroError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| VendaroError::Storage {
        source: Box::new(e),
    })?;
    for row in rows {
        writer.serialize(row).map_err(|e| VendaroError::Storage {
            source: Box::new(e),
        })?;
    }
    writer.flush().map_err(|e| VendaroError::Storage {
        source: Box::new(e),
    })?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vendaro_storage::queries::orders::{NewOrder, NewOrderItem};
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn seeded_db(dir: &Path) -> Database {
        let db = Database::open(dir.join("t.db").to_str().unwrap()).await.unwrap();
        let seller = accounts::create(&db, "maya", "maya@example.com", "Maya Iyer", None, "seller")
            .await
            .unwrap();
        let buyer = accounts::create(&db, "ravi", "ravi@example.com", "Ravi Nair", None, "buyer")
            .await
            .unwrap();
        let product = catalog::create(
            &db,
            catalog::NewProduct {
                seller_id: seller,
                name: "Ceramic Mug".into(),
                sku: "MUG-01".into(),
                category: Some("kitchen".into()),
                price: 349.0,
                stock: 12,
                weight_kg: Some(0.4),
                length_cm: Some(12.0),
                breadth_cm: Some(9.0),
                height_cm: Some(10.0),
            },
        )
        .await
        .unwrap();
        orders::create(
            &db,
            NewOrder {
                buyer_id: buyer,
                status: "confirmed".into(),
                payment_method: "prepaid".into(),
                subtotal: 698.0,
                shipping_name: "Ravi Nair".into(),
                shipping_address: "14 Lake Road".into(),
                shipping_city: "Pune".into(),
                shipping_state: "MH".into(),
                shipping_postcode: "411001".into(),
                shipping_phone: None,
                shipping_email: None,
                items: vec![NewOrderItem {
                    product_id: product,
                    quantity: 2,
                    unit_price: 349.0,
                }],
            },
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn export_entity_row_count_matches_source() {
        let dir = tempdir().unwrap();
        let db = seeded_db(dir.path()).await;
        let exporter = BackupExporter::new(db, dir.path().join("backups"), None);

        let outcome = exporter.export_entity(ExportEntity::Accounts).await.unwrap();
        assert_eq!(outcome.rows, 2);
        assert!(matches!(outcome.mirror, MirrorStatus::Disabled));

        // The file exists and its data rows match the reported count.
        let content = std::fs::read_to_string(&outcome.path).unwrap();
        let data_lines = content.lines().count() - 1; // minus header
        assert_eq!(data_lines, 2);
    }

    #[tokio::test]
    async fn export_all_produces_one_artifact_per_entity() {
        let dir = tempdir().unwrap();
        let db = seeded_db(dir.path()).await;
        let exporter = BackupExporter::new(db, dir.path().join("backups"), None);

        let outcomes = exporter.export_all().await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].entity, ExportEntity::Accounts);
        assert_eq!(outcomes[1].entity, ExportEntity::CatalogItems);
        assert_eq!(outcomes[2].entity, ExportEntity::Transactions);

        let grouped = exporter.list_artifacts().unwrap();
        assert_eq!(grouped["accounts"].len(), 1);
        assert_eq!(grouped["catalog-items"].len(), 1);
        assert_eq!(grouped["transactions"].len(), 1);

        // Filenames conform to the external naming contract.
        for outcome in &outcomes {
            let name = outcome.path.file_name().unwrap().to_str().unwrap();
            crate::artifacts::validate_name(name).unwrap();
        }
    }

    #[tokio::test]
    async fn export_all_aborts_on_first_failure() {
        let dir = tempdir().unwrap();
        let db = seeded_db(dir.path()).await;

        // Sabotage the last entity in the fixed order.
        db.connection()
            .call(|conn| {
                conn.execute_batch("DROP TABLE order_items; DROP TABLE orders;")?;
                Ok(())
            })
            .await
            .map_err(vendaro_storage::database::map_tr_err)
            .unwrap();

        let exporter = BackupExporter::new(db, dir.path().join("backups"), None);
        let err = exporter.export_all().await.unwrap_err();
        assert_eq!(err.code(), "STORAGE");

        // Earlier entities were written before the abort; the failed one was not.
        let grouped = exporter.list_artifacts().unwrap();
        assert_eq!(grouped["accounts"].len(), 1);
        assert_eq!(grouped["catalog-items"].len(), 1);
        assert_eq!(grouped["transactions"].len(), 0);
    }

    #[tokio::test]
    async fn mirror_failure_is_best_effort() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let db = seeded_db(dir.path()).await;
        let mirror = MirrorClient::new(&server.uri(), "backups", None).unwrap();
        let exporter = BackupExporter::new(db, dir.path().join("backups"), Some(mirror));

        let outcome = exporter.export_entity(ExportEntity::Accounts).await.unwrap();
        assert!(matches!(outcome.mirror, MirrorStatus::Failed(_)));
        assert!(outcome.path.exists(), "local artifact remains authoritative");
    }

    #[tokio::test]
    async fn mirror_success_reports_object_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/backups/\d{4}-\d{2}-\d{2}/accounts-backup-.*\.csv$"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let db = seeded_db(dir.path()).await;
        let mirror = MirrorClient::new(&server.uri(), "backups", None).unwrap();
        let exporter = BackupExporter::new(db, dir.path().join("backups"), Some(mirror));

        let outcome = exporter.export_entity(ExportEntity::Accounts).await.unwrap();
        match outcome.mirror {
            MirrorStatus::Uploaded(key) => assert!(key.starts_with("backups/")),
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn successive_exports_never_collide_on_filenames() {
        let dir = tempdir().unwrap();
        let db = seeded_db(dir.path()).await;
        let exporter = BackupExporter::new(db, dir.path().join("backups"), None);

        let a = exporter.export_entity(ExportEntity::Accounts).await.unwrap();
        let b = exporter.export_entity(ExportEntity::Accounts).await.unwrap();
        assert_ne!(a.path, b.path);

        let grouped = exporter.list_artifacts().unwrap();
        assert_eq!(grouped["accounts"].len(), 2);
    }
}
