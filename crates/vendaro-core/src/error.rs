// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vendaro marketplace backend.

use serde::Serialize;
use thiserror::Error;

/// The primary error type used across all Vendaro crates.
///
/// Carrier-facing failures are split three ways (authentication, permission,
/// generic) because the operator-facing message differs materially: a 401
/// means fix the stored credentials, a 403 means the carrier account lacks
/// the required plan tier, and anything else is a transient carrier fault.
#[derive(Debug, Error)]
pub enum VendaroError {
    /// Configuration errors (missing settings, invalid TOML, bad values).
    /// Never retried automatically.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed request rejected before any external call is attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Carrier login rejected the stored credentials.
    #[error("carrier authentication failed: {message}")]
    CarrierAuth { message: String },

    /// Carrier account lacks API permissions for the requested operation.
    #[error("insufficient carrier API permissions: {message}")]
    CarrierPermission { message: String },

    /// Generic carrier API failure (5xx, malformed response, network error).
    #[error("carrier error: {message}")]
    Carrier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Re-shipment attempt for an order that already has a carrier order.
    #[error("order {order_id} already has a carrier shipment")]
    AlreadyShipped { order_id: i64 },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VendaroError {
    /// Stable machine-readable code for this error category.
    pub fn code(&self) -> &'static str {
        match self {
            VendaroError::Config(_) => "CONFIG",
            VendaroError::Storage { .. } => "STORAGE",
            VendaroError::Validation(_) => "VALIDATION",
            VendaroError::NotFound(_) => "NOT_FOUND",
            VendaroError::CarrierAuth { .. } => "CARRIER_AUTH",
            VendaroError::CarrierPermission { .. } => "CARRIER_PERMISSION",
            VendaroError::Carrier { .. } => "CARRIER",
            VendaroError::AlreadyShipped { .. } => "ALREADY_SHIPPED",
            VendaroError::Timeout { .. } => "TIMEOUT",
            VendaroError::Internal(_) => "INTERNAL",
        }
    }

    /// Render as the structured `{error, message, code}` shape returned to
    /// callers instead of raw carrier payloads.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: true,
            message: self.to_string(),
            code: self.code(),
        }
    }
}

/// Serializable error envelope for batch results and `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
    pub code: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(VendaroError::Config("x".into()).code(), "CONFIG");
        assert_eq!(
            VendaroError::CarrierAuth { message: "x".into() }.code(),
            "CARRIER_AUTH"
        );
        assert_eq!(
            VendaroError::CarrierPermission { message: "x".into() }.code(),
            "CARRIER_PERMISSION"
        );
        assert_eq!(
            VendaroError::AlreadyShipped { order_id: 7 }.code(),
            "ALREADY_SHIPPED"
        );
    }

    #[test]
    fn body_serializes_with_code() {
        let err = VendaroError::AlreadyShipped { order_id: 42 };
        let json = serde_json::to_string(&err.body()).unwrap();
        assert!(json.contains("\"error\":true"));
        assert!(json.contains("\"code\":\"ALREADY_SHIPPED\""));
        assert!(json.contains("42"));
    }

    #[test]
    fn permission_error_message_differs_from_auth() {
        let auth = VendaroError::CarrierAuth { message: "bad password".into() };
        let perm = VendaroError::CarrierPermission { message: "plan tier".into() };
        assert!(auth.to_string().contains("authentication failed"));
        assert!(perm.to_string().contains("insufficient carrier API permissions"));
    }
}
