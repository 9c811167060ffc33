// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vendaro marketplace backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vendaro configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VendaroConfig {
    /// Marketplace identity and logging settings.
    #[serde(default)]
    pub marketplace: MarketplaceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Nightly backup settings.
    #[serde(default)]
    pub backup: BackupConfig,

    /// Shipping carrier API settings.
    #[serde(default)]
    pub carrier: CarrierConfig,
}

/// Marketplace identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketplaceConfig {
    /// Display name of the marketplace.
    #[serde(default = "default_marketplace_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: default_marketplace_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_marketplace_name() -> String {
    "vendaro".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("vendaro/vendaro.db").display().to_string())
        .unwrap_or_else(|| "vendaro.db".to_string())
}

/// Nightly backup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Directory where backup artifacts are written.
    #[serde(default = "default_backup_directory")]
    pub directory: String,

    /// Hour of day (0-23, local clock) for the daily backup.
    #[serde(default = "default_backup_hour")]
    pub hour: u32,

    /// Minute (0-59) for the daily backup.
    #[serde(default = "default_backup_minute")]
    pub minute: u32,

    /// Delay in minutes before retrying after a failed backup run.
    #[serde(default = "default_retry_delay_mins")]
    pub retry_delay_mins: u64,

    /// Object storage endpoint for mirroring. `None` disables mirroring.
    #[serde(default)]
    pub mirror_endpoint: Option<String>,

    /// Object storage bucket for mirrored artifacts.
    #[serde(default)]
    pub mirror_bucket: Option<String>,

    /// Bearer token for the object storage endpoint.
    #[serde(default)]
    pub mirror_token: Option<String>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_backup_directory(),
            hour: default_backup_hour(),
            minute: default_backup_minute(),
            retry_delay_mins: default_retry_delay_mins(),
            mirror_endpoint: None,
            mirror_bucket: None,
            mirror_token: None,
        }
    }
}

fn default_backup_directory() -> String {
    dirs::data_dir()
        .map(|d| d.join("vendaro/backups").display().to_string())
        .unwrap_or_else(|| "backups".to_string())
}

fn default_backup_hour() -> u32 {
    2
}

fn default_backup_minute() -> u32 {
    0
}

fn default_retry_delay_mins() -> u64 {
    30
}

/// Shipping carrier API configuration.
///
/// Carrier credentials and pickup location live in the marketplace settings
/// row in storage, not here; this section only configures how to reach the
/// carrier API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CarrierConfig {
    /// Base URL of the carrier API.
    #[serde(default = "default_carrier_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds for carrier API calls.
    #[serde(default = "default_carrier_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            base_url: default_carrier_base_url(),
            timeout_secs: default_carrier_timeout_secs(),
        }
    }
}

fn default_carrier_base_url() -> String {
    "https://api.carrier.example/v1".to_string()
}

fn default_carrier_timeout_secs() -> u64 {
    30
}
