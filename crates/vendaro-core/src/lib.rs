// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vendaro marketplace backend.
//!
//! Provides the shared error taxonomy and common types used throughout the
//! Vendaro workspace.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorBody, VendaroError};
pub use types::{PaymentMethod, ShippingStatus};
