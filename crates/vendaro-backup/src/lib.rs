// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nightly backup exporter for the Vendaro marketplace backend.
//!
//! Produces point-in-time CSV exports of the account, catalog, and
//! transaction collections. Local artifacts are the source of truth; object
//! storage mirroring is best-effort and its outcome is reported, never
//! allowed to fail an export.

pub mod artifacts;
pub mod entity;
pub mod exporter;
pub mod mirror;

pub use entity::ExportEntity;
pub use exporter::{BackupExporter, ExportOutcome, MirrorStatus};
pub use mirror::MirrorClient;
