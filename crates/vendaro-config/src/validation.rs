// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Figment catches type mismatches and unknown keys; this module checks the
//! semantic constraints a parsed config can still violate.

use crate::model::VendaroConfig;

/// Validate semantic constraints on a parsed config.
///
/// Returns all violations at once so the operator can fix them in one pass.
pub fn validate_config(config: &VendaroConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.backup.hour > 23 {
        errors.push(format!(
            "backup.hour must be 0-23, got {}",
            config.backup.hour
        ));
    }
    if config.backup.minute > 59 {
        errors.push(format!(
            "backup.minute must be 0-59, got {}",
            config.backup.minute
        ));
    }
    if config.backup.directory.trim().is_empty() {
        errors.push("backup.directory must not be empty".to_string());
    }
    if config.backup.retry_delay_mins == 0 {
        errors.push("backup.retry_delay_mins must be at least 1".to_string());
    }
    if config.backup.mirror_endpoint.is_some() && config.backup.mirror_bucket.is_none() {
        errors.push(
            "backup.mirror_bucket is required when backup.mirror_endpoint is set".to_string(),
        );
    }

    if config.carrier.base_url.trim().is_empty() {
        errors.push("carrier.base_url must not be empty".to_string());
    }
    if config.carrier.timeout_secs == 0 {
        errors.push("carrier.timeout_secs must be at least 1".to_string());
    }

    if config.storage.db_path.trim().is_empty() {
        errors.push("storage.db_path must not be empty".to_string());
    }

    let level = config.marketplace.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(format!(
            "marketplace.log_level must be one of trace/debug/info/warn/error, got {level:?}"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VendaroConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_schedule_rejected() {
        let mut config = VendaroConfig::default();
        config.backup.hour = 24;
        config.backup.minute = 60;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("backup.hour"));
        assert!(errors[1].contains("backup.minute"));
    }

    #[test]
    fn mirror_endpoint_requires_bucket() {
        let mut config = VendaroConfig::default();
        config.backup.mirror_endpoint = Some("https://store.example".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("mirror_bucket")));
    }

    #[test]
    fn bad_log_level_rejected() {
        let mut config = VendaroConfig::default();
        config.marketplace.log_level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("log_level")));
    }
}
