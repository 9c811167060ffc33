// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backup artifact registry: filename validation, listing, and deletion.
//!
//! Every operation that resolves a caller-supplied filename validates it
//! against a strict allow-list pattern BEFORE touching the filesystem. This
//! is the path-traversal guard for the artifact download/delete surface.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use vendaro_core::VendaroError;

use crate::entity::ExportEntity;

/// Allow-list pattern for artifact filenames. The character class excludes
/// path separators and dots, so no conforming name can escape the backup
/// directory.
fn artifact_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(accounts|catalog-items|transactions)-backup-[0-9A-Za-z-]+\.csv$")
            .expect("static artifact pattern")
    })
}

/// Validate a caller-supplied artifact name against the allow-list.
///
/// Returns the entity the name claims to belong to. Rejects anything else
/// with a validation error, before any filesystem access.
pub fn validate_name(name: &str) -> Result<ExportEntity, VendaroError> {
    let captures = artifact_pattern()
        .captures(name)
        .ok_or_else(|| VendaroError::Validation(format!("invalid artifact name: {name:?}")))?;
    ExportEntity::from_str(&captures[1])
        .map_err(|_| VendaroError::Validation(format!("unknown backup entity in {name:?}")))
}

/// Group existing artifact filenames by entity prefix.
///
/// Files in the directory that do not conform to the artifact pattern are
/// ignored. A missing directory yields an empty listing.
pub fn list(directory: &Path) -> Result<BTreeMap<String, Vec<String>>, VendaroError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entity in ExportEntity::ALL {
        grouped.insert(entity.prefix().to_string(), Vec::new());
    }

    if !directory.is_dir() {
        return Ok(grouped);
    }

    let entries = std::fs::read_dir(directory).map_err(|e| VendaroError::Storage {
        source: Box::new(e),
    })?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Ok(entity) = validate_name(name) {
            if let Some(bucket) = grouped.get_mut(entity.prefix()) {
                bucket.push(name.to_string());
            }
        }
    }

    for bucket in grouped.values_mut() {
        bucket.sort();
    }
    Ok(grouped)
}

/// Resolve a validated artifact name to its path inside `directory`.
pub fn resolve(directory: &Path, name: &str) -> Result<PathBuf, VendaroError> {
    validate_name(name)?;
    let path = directory.join(name);
    if !path.is_file() {
        return Err(VendaroError::NotFound(format!("artifact {name}")));
    }
    Ok(path)
}

/// Delete a validated artifact from `directory`.
pub fn delete(directory: &Path, name: &str) -> Result<(), VendaroError> {
    validate_name(name)?;
    let path = directory.join(name);
    std::fs::remove_file(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => VendaroError::NotFound(format!("artifact {name}")),
        _ => VendaroError::Storage {
            source: Box::new(e),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn traversal_names_rejected_without_filesystem_access() {
        // A directory that does not exist: if validation passed, resolution
        // would fail differently, so a Validation error proves the guard
        // fired first.
        let missing = Path::new("/definitely/not/a/dir");
        for name in [
            "../../etc/passwd",
            "accounts-backup-../../etc/passwd.csv",
            "accounts-backup-..%2F..%2Fetc.csv",
            "/etc/passwd",
            "accounts-backup-2024.csv.exe",
            "orders-backup-2024-01-01.csv",
            "accounts-backup-.csv",
        ] {
            let err = resolve(missing, name).unwrap_err();
            assert_eq!(err.code(), "VALIDATION", "{name} must be rejected");
            let err = delete(missing, name).unwrap_err();
            assert_eq!(err.code(), "VALIDATION", "{name} must be rejected");
        }
    }

    #[test]
    fn conforming_names_accepted_per_entity() {
        assert_eq!(
            validate_name("accounts-backup-2024-01-01T00-00-00.csv").unwrap(),
            ExportEntity::Accounts
        );
        assert_eq!(
            validate_name("catalog-items-backup-2026-08-06T02-00-00-123-9f2a.csv").unwrap(),
            ExportEntity::CatalogItems
        );
        assert_eq!(
            validate_name("transactions-backup-x.csv").unwrap(),
            ExportEntity::Transactions
        );
    }

    #[test]
    fn list_groups_by_prefix_and_ignores_unrelated_files() {
        let dir = tempdir().unwrap();
        for name in [
            "accounts-backup-2024-01-01T00-00-00.csv",
            "accounts-backup-2024-01-02T00-00-00.csv",
            "catalog-items-backup-2024-01-01T00-00-00.csv",
            "notes.txt",
            "transactions.csv",
            "accounts-backup-evil.sh",
        ] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let grouped = list(dir.path()).unwrap();
        assert_eq!(grouped["accounts"].len(), 2);
        assert_eq!(grouped["catalog-items"].len(), 1);
        assert_eq!(grouped["transactions"].len(), 0);
    }

    #[test]
    fn list_missing_directory_is_empty() {
        let grouped = list(Path::new("/definitely/not/a/dir")).unwrap();
        assert!(grouped.values().all(|v| v.is_empty()));
    }

    #[test]
    fn delete_removes_only_the_named_artifact() {
        let dir = tempdir().unwrap();
        let keep = "accounts-backup-2024-01-01T00-00-00.csv";
        let drop = "accounts-backup-2024-01-02T00-00-00.csv";
        std::fs::write(dir.path().join(keep), b"x").unwrap();
        std::fs::write(dir.path().join(drop), b"x").unwrap();

        delete(dir.path(), drop).unwrap();
        assert!(dir.path().join(keep).exists());
        assert!(!dir.path().join(drop).exists());

        let err = delete(dir.path(), drop).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
