//! Fetch orchestration: which day is selected, where its data comes from,
//! and what every observer currently sees.
//!
//! The orchestrator is the single writer of a [`Snapshot`] published through
//! a `tokio::sync::watch` channel. Each fetch is tagged with a sequence
//! number; a result is installed only while its number is still the latest
//! issued, so a slow answer for a day the user already navigated away from
//! never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, TimeDelta};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::config::OrchestratorConfig;
use crate::fallback;
use crate::mapper::MapError;
use crate::model::{Location, ModelError, PanchangamDay};
use crate::traits::{Clock, PanchangamSource};

/// Why a day could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("remote almanac unavailable: {0}")]
    Remote(#[from] ApiError),
    #[error("remote almanac response unusable: {0}")]
    Mapping(#[from] MapError),
    #[error("could not build offline almanac: {0}")]
    Synthesis(#[from] ModelError),
}

/// Where the displayed day came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready(Provenance),
    Failed,
}

/// What to do when the remote source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Substitute synthesized data and report success.
    #[default]
    Always,
    /// Surface the failure as [`Phase::Failed`].
    Never,
}

/// A consistent view of the orchestrator's state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub selected_date: NaiveDate,
    pub location: Location,
    pub phase: Phase,
    /// The most recently installed day. It stays visible while a newer
    /// request is loading.
    pub day: Option<Arc<PanchangamDay>>,
    pub last_error: Option<FetchError>,
    /// Sequence number of the request this snapshot reflects.
    pub sequence: u64,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self.phase {
            Phase::Ready(provenance) => Some(provenance),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance() == Some(Provenance::Fallback)
    }
}

struct Inner<S> {
    source: S,
    clock: Arc<dyn Clock>,
    config: OrchestratorConfig,
    policy: FallbackPolicy,
    state: watch::Sender<Snapshot>,
    latest_sequence: AtomicU64,
    last_remote_error: Mutex<Option<FetchError>>,
}

/// Drives fetches for the selected date and location.
///
/// Methods that start work spawn onto the current Tokio runtime and return
/// immediately; observe progress through [`Orchestrator::subscribe`].
pub struct Orchestrator<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Orchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PanchangamSource> Orchestrator<S> {
    /// Create an idle orchestrator positioned on today's date at `location`.
    pub fn new(source: S, clock: Arc<dyn Clock>, location: Location, config: OrchestratorConfig) -> Self {
        Self::with_policy(source, clock, location, config, FallbackPolicy::default())
    }

    pub fn with_policy(
        source: S,
        clock: Arc<dyn Clock>,
        location: Location,
        config: OrchestratorConfig,
        policy: FallbackPolicy,
    ) -> Self {
        let initial = Snapshot {
            selected_date: clock.today_in(location.tz()),
            location,
            phase: Phase::Idle,
            day: None,
            last_error: None,
            sequence: 0,
        };
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                source,
                clock,
                config,
                policy,
                state,
                latest_sequence: AtomicU64::new(0),
                last_remote_error: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.borrow().clone()
    }

    /// The most recent remote failure, kept even when fallback data hid it.
    /// Cleared by the next remote success.
    pub fn last_remote_error(&self) -> Option<FetchError> {
        self.inner
            .last_remote_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wait until no request is loading and return that snapshot.
    pub async fn settled(&self) -> Snapshot {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.is_loading()).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Fetch the selected day now.
    pub fn load(&self) -> u64 {
        let request = self.begin(|_| {});
        self.spawn_fetch(request, self.inner.policy, None)
    }

    /// Fetch the selected day again with the configured policy.
    pub fn retry(&self) -> u64 {
        self.load()
    }

    /// Fetch the selected day again, surfacing a remote failure instead of
    /// substituting fallback data.
    pub fn retry_strict(&self) -> u64 {
        let request = self.begin(|_| {});
        self.spawn_fetch(request, FallbackPolicy::Never, None)
    }

    /// Select a date. The fetch starts once the selection has been stable
    /// for the debounce period; selecting the current date does nothing.
    pub fn select_date(&self, date: NaiveDate) -> Option<u64> {
        if self.inner.state.borrow().selected_date == date {
            return None;
        }
        let request = self.begin(|s| s.selected_date = date);
        Some(self.spawn_fetch(request, self.inner.policy, Some(self.inner.config.debounce())))
    }

    pub fn next_day(&self) -> Option<u64> {
        self.shift_date(TimeDelta::days(1))
    }

    pub fn previous_day(&self) -> Option<u64> {
        self.shift_date(TimeDelta::days(-1))
    }

    /// Select today's date in the current location's timezone.
    pub fn go_to_today(&self) -> Option<u64> {
        let tz = self.inner.state.borrow().location.tz();
        self.select_date(self.inner.clock.today_in(tz))
    }

    /// Select a location and fetch immediately.
    pub fn select_location(&self, location: Location) -> u64 {
        let request = self.begin(|s| s.location = location);
        self.spawn_fetch(request, self.inner.policy, None)
    }

    /// Drop the surfaced error. A failed phase returns to idle.
    pub fn clear_error(&self) {
        self.inner.state.send_modify(|s| {
            s.last_error = None;
            if s.phase == Phase::Failed {
                s.phase = Phase::Idle;
            }
        });
    }

    fn shift_date(&self, delta: TimeDelta) -> Option<u64> {
        let current = self.inner.state.borrow().selected_date;
        let date = current.checked_add_signed(delta)?;
        self.select_date(date)
    }

    /// Issue a new sequence number and enter loading.
    fn begin(&self, update: impl FnOnce(&mut Snapshot)) -> Request {
        let mut sequence = 0;
        self.inner.state.send_modify(|s| {
            sequence = self.inner.latest_sequence.fetch_add(1, Ordering::SeqCst) + 1;
            update(s);
            s.phase = Phase::Loading;
            s.sequence = sequence;
        });

        let snapshot = self.inner.state.borrow();
        Request {
            sequence,
            date: snapshot.selected_date,
            location: snapshot.location.clone(),
        }
    }

    fn spawn_fetch(&self, request: Request, policy: FallbackPolicy, delay: Option<std::time::Duration>) -> u64 {
        let inner = Arc::clone(&self.inner);
        let sequence = request.sequence;

        tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
                if !inner.is_latest(request.sequence) {
                    debug!(sequence = request.sequence, date = %request.date, "Selection changed during debounce, skipping fetch");
                    return;
                }
            }
            inner.run(request, policy).await;
        });
        sequence
    }
}

/// One issued fetch.
struct Request {
    sequence: u64,
    date: NaiveDate,
    location: Location,
}

impl<S: PanchangamSource> Inner<S> {
    fn is_latest(&self, sequence: u64) -> bool {
        self.latest_sequence.load(Ordering::SeqCst) == sequence
    }

    async fn run(&self, request: Request, policy: FallbackPolicy) {
        let Request {
            sequence,
            date,
            location,
        } = request;
        debug!(sequence, %date, location = location.name(), "Fetching panchangam");

        let fetched = tokio::time::timeout(self.config.fetch_timeout(), self.source.fetch_day(date, &location))
            .await
            .unwrap_or_else(|_| {
                debug!(sequence, %date, "Fetch exceeded its wait bound");
                Err(FetchError::Remote(ApiError::TimedOut))
            });
        let error = match fetched {
            Ok(day) => {
                if self.install(sequence, Phase::Ready(Provenance::Remote), Some(day), None) {
                    self.record_remote_error(None);
                    info!(sequence, %date, "Installed remote panchangam");
                }
                return;
            }
            Err(error) => error,
        };

        if !self.is_latest(sequence) {
            debug!(sequence, %date, error = %error, "Discarding failure of superseded request");
            return;
        }
        warn!(sequence, %date, error = %error, "Remote fetch failed");
        self.record_remote_error(Some(error.clone()));

        match policy {
            FallbackPolicy::Never => {
                self.install(sequence, Phase::Failed, None, Some(error));
            }
            FallbackPolicy::Always => {
                tokio::time::sleep(self.config.fallback_delay()).await;
                match fallback::synthesize(date, &location) {
                    Ok(day) => {
                        if self.install(sequence, Phase::Ready(Provenance::Fallback), Some(day), None) {
                            info!(sequence, %date, "Installed fallback panchangam");
                        }
                    }
                    Err(synthesis) => {
                        self.install(sequence, Phase::Failed, None, Some(FetchError::Synthesis(synthesis)));
                    }
                }
            }
        }
    }

    /// Apply a result if it still belongs to the latest request.
    fn install(
        &self,
        sequence: u64,
        phase: Phase,
        day: Option<PanchangamDay>,
        error: Option<FetchError>,
    ) -> bool {
        let installed = self.state.send_if_modified(|s| {
            if s.sequence != sequence {
                return false;
            }
            s.phase = phase;
            if let Some(day) = day {
                s.day = Some(Arc::new(day));
            }
            s.last_error = error;
            true
        });
        if !installed {
            debug!(sequence, "Discarding superseded result");
        }
        installed
    }

    fn record_remote_error(&self, error: Option<FetchError>) {
        *self.last_remote_error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_provenance() {
        let mut snapshot = Snapshot {
            selected_date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
            location: Location::chennai(),
            phase: Phase::Loading,
            day: None,
            last_error: None,
            sequence: 1,
        };
        assert!(snapshot.is_loading());
        assert_eq!(snapshot.provenance(), None);

        snapshot.phase = Phase::Ready(Provenance::Fallback);
        assert!(!snapshot.is_loading());
        assert!(snapshot.is_fallback());

        snapshot.phase = Phase::Ready(Provenance::Remote);
        assert!(!snapshot.is_fallback());
    }

    #[test]
    fn test_fetch_error_conversions() {
        let err: FetchError = ApiError::TimedOut.into();
        assert_eq!(err, FetchError::Remote(ApiError::TimedOut));
        assert_eq!(err.to_string(), "remote almanac unavailable: request timed out");

        let err: FetchError = ModelError::NoAuspiciousWindow.into();
        assert!(matches!(err, FetchError::Synthesis(_)));
    }

    #[test]
    fn test_default_policy_falls_back() {
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Always);
    }
}
