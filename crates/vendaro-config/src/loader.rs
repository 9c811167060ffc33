// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vendaro.toml` > `~/.config/vendaro/vendaro.toml` > `/etc/vendaro/vendaro.toml`
//! with environment variable overrides via `VENDARO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VendaroConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vendaro/vendaro.toml` (system-wide)
/// 3. `~/.config/vendaro/vendaro.toml` (user XDG config)
/// 4. `./vendaro.toml` (local directory)
/// 5. `VENDARO_*` environment variables
pub fn load_config() -> Result<VendaroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendaroConfig::default()))
        .merge(Toml::file("/etc/vendaro/vendaro.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vendaro/vendaro.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vendaro.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VendaroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendaroConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VendaroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendaroConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VENDARO_BACKUP_MIRROR_ENDPOINT`
/// must map to `backup.mirror_endpoint`, not `backup.mirror.endpoint`.
fn env_provider() -> Env {
    Env::prefixed("VENDARO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VENDARO_BACKUP_MIRROR_ENDPOINT -> "backup_mirror_endpoint"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("marketplace_", "marketplace.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("backup_", "backup.", 1)
            .replacen("carrier_", "carrier.", 1);
        mapped.into()
    })
}
