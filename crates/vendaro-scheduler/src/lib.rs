// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily job scheduler for the Vendaro marketplace backend.
//!
//! Guarantees a named job runs once per day at a configured time, with
//! bounded-delay recovery from failure and at most one pending timer at any
//! moment. Timer state is in-memory only; the daemon re-arms on boot.

pub mod daily;
pub mod job;

pub use daily::{next_occurrence, DailyScheduler, ScheduleStatus};
pub use job::Job;
