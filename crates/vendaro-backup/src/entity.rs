// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed set of entity collections covered by backups.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An exportable entity collection.
///
/// The kebab-case name doubles as the artifact filename prefix, which is
/// part of the external naming contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ExportEntity {
    Accounts,
    CatalogItems,
    Transactions,
}

impl ExportEntity {
    /// Every supported entity, in the fixed order `export_all` uses.
    pub const ALL: [ExportEntity; 3] = [
        ExportEntity::Accounts,
        ExportEntity::CatalogItems,
        ExportEntity::Transactions,
    ];

    /// The artifact filename prefix for this entity.
    pub fn prefix(&self) -> &'static str {
        match self {
            ExportEntity::Accounts => "accounts",
            ExportEntity::CatalogItems => "catalog-items",
            ExportEntity::Transactions => "transactions",
        }
    }
}
