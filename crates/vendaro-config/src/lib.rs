// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Vendaro marketplace backend.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use vendaro_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Marketplace: {}", config.marketplace.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::VendaroConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to a plain error message
///
/// Returns either a valid `VendaroConfig` or a list of error messages.
pub fn load_and_validate() -> Result<VendaroConfig, Vec<String>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(err.into_iter().map(|e| e.to_string()).collect()),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<VendaroConfig, Vec<String>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(err.into_iter().map(|e| e.to_string()).collect()),
    }
}

/// Render config errors to stderr, one per line.
pub fn render_errors(errors: &[String]) {
    eprintln!("vendaro: configuration errors:");
    for error in errors {
        eprintln!("  - {error}");
    }
}
