//! Abstractions for time and the almanac source to enable testing.
//!
//! This module provides traits for:
//! - `Clock`: Abstracting time access for deterministic testing
//! - `PanchangamSource`: Abstracting where a day's almanac comes from

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::api::ApiError;
use crate::fallback;
use crate::model::{Location, PanchangamDay};
use crate::orchestrator::FetchError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ==================== Clock Trait ====================

/// Trait for abstracting time access.
///
/// This allows injecting mock clocks during testing to create
/// deterministic, reproducible tests for time-dependent logic.
pub trait Clock: Send + Sync {
    /// Get the current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get the current time in the local timezone.
    fn now_local(&self) -> DateTime<Local>;

    /// The calendar date it currently is in `tz`.
    fn today_in(&self, tz: Tz) -> NaiveDate {
        self.now_utc().with_timezone(&tz).date_naive()
    }
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Mock clock for testing with controllable time.
#[derive(Debug, Clone)]
pub struct MockClock {
    utc_time: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a new mock clock set to the given UTC time.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            utc_time: Arc::new(Mutex::new(time)),
        }
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: DateTime<Utc>) {
        *lock(&self.utc_time) = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = lock(&self.utc_time);
        *time += duration;
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *lock(&self.utc_time)
    }

    fn now_local(&self) -> DateTime<Local> {
        self.now_utc().with_timezone(&Local)
    }
}

// ==================== PanchangamSource Trait ====================

/// Trait for abstracting the upstream almanac.
///
/// The orchestrator only ever sees this seam, so tests can drive it with
/// a scripted source instead of a live HTTP server.
pub trait PanchangamSource: Send + Sync + 'static {
    /// Fetch one fully mapped day for `location`.
    fn fetch_day(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> impl Future<Output = Result<PanchangamDay, FetchError>> + Send;
}

/// Scripted source for testing that records every request.
///
/// Successful answers are built from the fallback synthesizer so they are
/// complete and deterministic. Latency is simulated with `tokio::time`,
/// which makes it controllable under a paused test runtime.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    calls: Arc<Mutex<Vec<(NaiveDate, Uuid)>>>,
    failure: Arc<Mutex<Option<ApiError>>>,
    latency: Arc<Mutex<Duration>>,
    latency_by_date: Arc<Mutex<HashMap<NaiveDate, Duration>>>,
}

impl MockSource {
    /// Create a source that answers immediately and successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent request fail with `error`. The outcome is
    /// fixed when a request starts, before any simulated latency.
    pub fn fail_with(&self, error: ApiError) {
        *lock(&self.failure) = Some(error);
    }

    /// Make subsequent requests succeed again.
    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    /// Delay every answer by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = latency;
    }

    /// Delay answers for one date, overriding the general latency.
    pub fn set_latency_for(&self, date: NaiveDate, latency: Duration) {
        lock(&self.latency_by_date).insert(date, latency);
    }

    /// Dates requested so far, in request order.
    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        lock(&self.calls).iter().map(|(date, _)| *date).collect()
    }

    /// Location ids requested so far, in request order.
    pub fn requested_locations(&self) -> Vec<Uuid> {
        lock(&self.calls).iter().map(|(_, id)| *id).collect()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl PanchangamSource for MockSource {
    async fn fetch_day(&self, date: NaiveDate, location: &Location) -> Result<PanchangamDay, FetchError> {
        lock(&self.calls).push((date, location.id()));
        let failure = lock(&self.failure).clone();

        let latency = lock(&self.latency_by_date)
            .get(&date)
            .copied()
            .unwrap_or_else(|| *lock(&self.latency));
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match failure {
            Some(error) => Err(FetchError::Remote(error)),
            None => fallback::synthesize(date, location).map_err(FetchError::Synthesis),
        }
    }
}
