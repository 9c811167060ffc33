// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per domain area.

pub mod accounts;
pub mod catalog;
pub mod orders;
pub mod settings;
