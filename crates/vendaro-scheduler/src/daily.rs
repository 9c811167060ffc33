// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot-timer daily scheduler.
//!
//! Each scheduler owns exactly one pending timer task. Arming a new timer
//! atomically replaces the old one, and a generation counter fences stale
//! timer tasks out of the re-arm path after `cancel` or re-`schedule`.
//!
//! Failure semantics: a failed job run is retried once after a fixed delay,
//! then the normal daily cadence resumes regardless of the retry's outcome.
//! Only `cancel` stops recurrence.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use vendaro_core::VendaroError;

use crate::job::Job;

/// Compute the next occurrence of `time` strictly after `now`.
///
/// A candidate equal to `now` counts as already passed and rolls over to
/// tomorrow, so the armed delay is never zero or negative.
pub fn next_occurrence(now: DateTime<Local>, time: NaiveTime) -> DateTime<Local> {
    match resolve_local(now.date_naive(), time) {
        Some(candidate) if candidate > now => candidate,
        _ => resolve_local(now.date_naive() + Days::new(1), time)
            .unwrap_or(now + chrono::Duration::days(1)),
    }
}

/// Resolve a wall-clock date+time to a local instant.
///
/// DST ambiguity takes the earlier instant; a nonexistent time (spring-forward
/// gap) shifts one hour later.
fn resolve_local(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&date.and_time(time)) {
        chrono::LocalResult::Single(dt) => Some(dt),
        chrono::LocalResult::Ambiguous(earliest, _) => Some(earliest),
        chrono::LocalResult::None => Local
            .from_local_datetime(&(date.and_time(time) + chrono::Duration::hours(1)))
            .earliest(),
    }
}

/// Snapshot of the scheduler's armed state.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStatus {
    pub armed: bool,
    pub next_run_at: Option<DateTime<Local>>,
    pub remaining_secs: Option<u64>,
}

/// Clock source for the scheduler.
///
/// `Anchored` pins chrono time to the tokio clock so paused-time tests see a
/// consistent view; production uses the system clock directly.
#[derive(Clone)]
enum Clock {
    System,
    #[cfg(test)]
    Anchored {
        base: DateTime<Local>,
        origin: tokio::time::Instant,
    },
}

impl Clock {
    fn now(&self) -> DateTime<Local> {
        match self {
            Clock::System => Local::now(),
            #[cfg(test)]
            Clock::Anchored { base, origin } => {
                let elapsed = chrono::Duration::from_std(origin.elapsed())
                    .unwrap_or_else(|_| chrono::Duration::zero());
                *base + elapsed
            }
        }
    }
}

struct TimerState {
    handle: Option<JoinHandle<()>>,
    next_run_at: Option<DateTime<Local>>,
    generation: u64,
}

/// A scheduler for one recurring daily job.
///
/// Cheap to clone; all clones share the same timer state. Construct one per
/// job name so jobs never collide on shared globals.
#[derive(Clone)]
pub struct DailyScheduler {
    job: Arc<dyn Job>,
    retry_delay: Duration,
    clock: Clock,
    state: Arc<Mutex<TimerState>>,
}

impl DailyScheduler {
    /// Create a scheduler for `job` with the given failure retry delay.
    pub fn new(job: Arc<dyn Job>, retry_delay: Duration) -> Self {
        Self {
            job,
            retry_delay,
            clock: Clock::System,
            state: Arc::new(Mutex::new(TimerState {
                handle: None,
                next_run_at: None,
                generation: 0,
            })),
        }
    }

    /// Test constructor: anchor chrono time to the tokio clock at `base`.
    #[cfg(test)]
    fn anchored(job: Arc<dyn Job>, retry_delay: Duration, base: DateTime<Local>) -> Self {
        let mut scheduler = Self::new(job, retry_delay);
        scheduler.clock = Clock::Anchored {
            base,
            origin: tokio::time::Instant::now(),
        };
        scheduler
    }

    /// Arm (or re-arm) the daily timer for `hour:minute`.
    ///
    /// Cancels any pending timer first, so exactly one timer exists per
    /// scheduler. Returns the computed next-run instant.
    pub fn schedule(&self, hour: u32, minute: u32) -> Result<DateTime<Local>, VendaroError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            VendaroError::Validation(format!("invalid schedule time {hour:02}:{minute:02}"))
        })?;

        let next = next_occurrence(self.clock.now(), time);
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        let generation = state.generation;
        if let Some(handle) = state.handle.take() {
            handle.abort();
        }
        state.next_run_at = Some(next);
        state.handle = Some(tokio::spawn(self.clone().run_cycle(
            generation,
            hour,
            minute,
            next,
        )));

        info!(job = %self.job.name(), next_run = %next, "daily job scheduled");
        Ok(next)
    }

    /// Current armed state, next-run instant, and remaining delay.
    pub fn status(&self) -> ScheduleStatus {
        let state = self.state.lock().unwrap();
        match state.next_run_at {
            Some(next) => {
                let remaining = (next - self.clock.now())
                    .to_std()
                    .unwrap_or(Duration::ZERO);
                ScheduleStatus {
                    armed: true,
                    next_run_at: Some(next),
                    remaining_secs: Some(remaining.as_secs()),
                }
            }
            None => ScheduleStatus {
                armed: false,
                next_run_at: None,
                remaining_secs: None,
            },
        }
    }

    /// Clear the pending timer. Returns whether one was actually pending;
    /// calling with nothing scheduled is an idempotent no-op.
    ///
    /// Has no effect on a job execution already in flight.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        let had_timer = state.handle.is_some();
        if let Some(handle) = state.handle.take() {
            handle.abort();
        }
        state.next_run_at = None;
        if had_timer {
            info!(job = %self.job.name(), "daily job canceled");
        }
        had_timer
    }

    /// Run the job body immediately and await its result.
    ///
    /// Independent of the armed timer: does not disturb or consume the next
    /// scheduled fire, and propagates the job's error to the caller.
    pub async fn run_now(&self) -> Result<(), VendaroError> {
        info!(job = %self.job.name(), "manual run requested");
        self.job.run().await
    }

    /// One timer cycle: sleep until the fire instant, run the job (with one
    /// fixed-delay retry on failure), then re-arm for the next day.
    async fn run_cycle(
        self,
        generation: u64,
        hour: u32,
        minute: u32,
        fire_at: DateTime<Local>,
    ) {
        let delay = (fire_at - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        tokio::time::sleep(delay).await;

        {
            let mut state = self.state.lock().unwrap();
            if state.generation != generation {
                return;
            }
            state.next_run_at = None;
        }

        if self.execute().await.is_err() {
            warn!(
                job = %self.job.name(),
                retry_in_secs = self.retry_delay.as_secs(),
                "job failed; retrying after fixed delay"
            );
            tokio::time::sleep(self.retry_delay).await;
            if self.state.lock().unwrap().generation != generation {
                return;
            }
            // The retry outcome does not change what happens next: the
            // daily cadence resumes either way.
            let _ = self.execute().await;
        }

        self.rearm(generation, hour, minute);
    }

    /// Run the job body on its own task so that aborting the timer task can
    /// never cancel an execution already in flight.
    async fn execute(&self) -> Result<(), VendaroError> {
        let job = Arc::clone(&self.job);
        let name = job.name().to_string();
        let handle = tokio::spawn(async move { job.run().await });
        match handle.await {
            Ok(Ok(())) => {
                info!(job = %name, "job run completed");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(job = %name, error = %e, "job run failed");
                Err(e)
            }
            Err(e) => {
                error!(job = %name, error = %e, "job run panicked");
                Err(VendaroError::Internal(format!("job {name} panicked: {e}")))
            }
        }
    }

    /// Arm the next daily occurrence, unless a cancel or re-schedule has
    /// superseded this cycle.
    fn rearm(&self, generation: u64, hour: u32, minute: u32) {
        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
            return;
        };
        let next = next_occurrence(self.clock.now(), time);
        let mut state = self.state.lock().unwrap();
        if state.generation != generation {
            return;
        }
        state.next_run_at = Some(next);
        state.handle = Some(tokio::spawn(self.clone().run_cycle(
            generation,
            hour,
            minute,
            next,
        )));
        info!(job = %self.job.name(), next_run = %next, "daily job re-armed");
    }
}
