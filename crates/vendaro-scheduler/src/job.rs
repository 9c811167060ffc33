// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The job abstraction the scheduler drives.

use async_trait::async_trait;
use vendaro_core::VendaroError;

/// A unit of scheduled work.
///
/// Implementations must be safe to run again after a failure: the scheduler
/// retries a failed run once after a fixed delay, and every daily fire is a
/// fresh invocation.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Name used in logs and status output.
    fn name(&self) -> &str;

    /// Execute one run of the job.
    async fn run(&self) -> Result<(), VendaroError>;
}
