//! Per-provider rolling-window health statistics.
//!
//! Each provider owns one [`ProviderStats`] tracker. The tracker retains the
//! outcomes of the trailing five minutes, counts requests issued in the
//! current rolling sixty-second admission window, and derives the error count
//! and mean response time that selection ranks on. Old entries age out
//! lazily: every read and write rolls the windows forward before touching
//! state, so no caller ever observes an expired record.

use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Retention horizon for recorded outcomes.
pub const OUTCOME_RETENTION: Duration = Duration::from_secs(5 * 60);

/// Length of the rolling admission window.
pub const ADMISSION_WINDOW: Duration = Duration::from_secs(60);

/// Mean response time reported while the outcome window is empty.
///
/// An idle or brand-new provider reports the worst representable latency, so
/// among providers with equal error counts it ranks behind any provider with
/// recorded traffic. Callers that want "no data" semantics must check for
/// this value explicitly.
pub const EMPTY_WINDOW_AVG_MS: f64 = f64::MAX;

/// One completed dispatch attempt.
#[derive(Debug, Clone, Copy)]
struct OutcomeRecord {
    recorded_at: Instant,
    is_error: bool,
    response_time_ms: u64,
}

/// Internal mutable state protected by a single `Mutex`.
///
/// Consolidates the outcome sequence, the admission counter and its window
/// timestamp, and the derived metrics, so every multi-field transition
/// happens atomically within one lock acquisition. Splitting these behind
/// separate locks would allow a reader to observe a request counted toward
/// the new window while the timestamp still reflects the old one.
#[derive(Debug)]
struct StatsInternalState {
    /// Retained outcomes, oldest first. Insertion order is time order.
    outcomes: VecDeque<OutcomeRecord>,
    /// Number of error outcomes among `outcomes`.
    error_count: u32,
    /// Arithmetic mean response time over `outcomes`, or
    /// [`EMPTY_WINDOW_AVG_MS`] when empty.
    avg_response_time_ms: f64,
    /// Requests issued within the current admission window.
    window_count: u32,
    /// Start of the current admission window.
    window_started_at: Instant,
}

impl StatsInternalState {
    fn new(now: Instant) -> Self {
        Self {
            outcomes: VecDeque::new(),
            error_count: 0,
            avg_response_time_ms: EMPTY_WINDOW_AVG_MS,
            window_count: 0,
            window_started_at: now,
        }
    }
}

/// Point-in-time view of one tracker, captured under a single lock.
///
/// Selection reads one snapshot per provider instead of calling the
/// individual accessors, so the admission verdict and both ranking metrics
/// are guaranteed to describe the same state.
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    /// Whether the provider can currently accept another request.
    pub accepting: bool,
    /// Error outcomes within the retention horizon.
    pub error_count: u32,
    /// Mean response time within the retention horizon, or
    /// [`EMPTY_WINDOW_AVG_MS`] when no outcomes are retained.
    pub avg_response_time_ms: f64,
    /// Requests issued within the current admission window.
    pub requests_in_window: u32,
}

/// Rolling-window statistics tracker for one provider.
///
/// Records the outcome of every completed dispatch attempt, enforces the
/// per-minute admission cap, and exposes the derived health metrics used to
/// rank providers.
///
/// # Thread Safety
///
/// All mutable state is protected by a single `Mutex` so state transitions
/// are linearizable: concurrent `record_outcome`/`can_accept_request` calls
/// behave as if executed in some serial order. Critical sections are short
/// and never held across an `.await`.
pub struct ProviderStats {
    /// All mutable state under a single lock.
    inner: Mutex<StatsInternalState>,
    /// Immutable: admission cap for one rolling window.
    max_requests_per_minute: u32,
    /// Immutable: length of the rolling admission window.
    admission_window: Duration,
    /// Immutable: retention horizon for outcomes.
    retention: Duration,
}

impl ProviderStats {
    /// Creates a tracker with the production window durations
    /// ([`ADMISSION_WINDOW`] and [`OUTCOME_RETENTION`]).
    #[must_use]
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self::with_windows(max_requests_per_minute, ADMISSION_WINDOW, OUTCOME_RETENTION)
    }

    /// Creates a tracker with explicit window durations.
    ///
    /// Shorter horizons let window-expiry behavior be exercised without
    /// waiting out the production durations; semantics are otherwise
    /// identical to [`ProviderStats::new`].
    #[must_use]
    pub fn with_windows(
        max_requests_per_minute: u32,
        admission_window: Duration,
        retention: Duration,
    ) -> Self {
        Self {
            inner: Mutex::new(StatsInternalState::new(Instant::now())),
            max_requests_per_minute,
            admission_window,
            retention,
        }
    }

    /// Records the outcome of one completed dispatch attempt.
    ///
    /// Appends the outcome with the current timestamp, counts the request
    /// toward the admission window (resetting the window first if it has
    /// expired), purges outcomes past the retention horizon, and recomputes
    /// the derived metrics. Infallible and safe under concurrent invocation;
    /// the whole update is one critical section.
    pub fn record_outcome(&self, is_error: bool, response_time_ms: u64) {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        self.roll_windows(&mut inner, now);
        inner.window_count += 1;
        inner.outcomes.push_back(OutcomeRecord { recorded_at: now, is_error, response_time_ms });
        Self::recompute_derived(&mut inner);
        tracing::trace!(
            is_error,
            response_time_ms,
            retained_outcomes = inner.outcomes.len(),
            requests_in_window = inner.window_count,
            "outcome recorded"
        );
    }

    /// Returns whether the provider may be sent another request right now.
    ///
    /// True iff the admission counter is strictly below the configured
    /// per-minute cap. Reading rolls the window forward first, so an expired
    /// window is observed as reset here exactly as it would be by
    /// [`record_outcome`](Self::record_outcome).
    #[must_use]
    pub fn can_accept_request(&self) -> bool {
        let mut inner = self.inner.lock();
        self.roll_windows(&mut inner, Instant::now());
        inner.window_count < self.max_requests_per_minute
    }

    /// Number of error outcomes within the retention horizon.
    #[must_use]
    pub fn error_count_5min(&self) -> u32 {
        let mut inner = self.inner.lock();
        self.roll_windows(&mut inner, Instant::now());
        inner.error_count
    }

    /// Mean response time in milliseconds over the retention horizon.
    ///
    /// Returns [`EMPTY_WINDOW_AVG_MS`] when no outcomes are retained; see the
    /// constant for the selection consequence.
    #[must_use]
    pub fn avg_response_time_5min(&self) -> f64 {
        let mut inner = self.inner.lock();
        self.roll_windows(&mut inner, Instant::now());
        inner.avg_response_time_ms
    }

    /// Requests issued within the current admission window.
    #[must_use]
    pub fn requests_in_current_minute(&self) -> u32 {
        let mut inner = self.inner.lock();
        self.roll_windows(&mut inner, Instant::now());
        inner.window_count
    }

    /// Captures the admission verdict and both ranking metrics under one
    /// lock acquisition.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        let mut inner = self.inner.lock();
        self.roll_windows(&mut inner, Instant::now());
        StatsSnapshot {
            accepting: inner.window_count < self.max_requests_per_minute,
            error_count: inner.error_count,
            avg_response_time_ms: inner.avg_response_time_ms,
            requests_in_window: inner.window_count,
        }
    }

    /// Configured admission cap.
    #[must_use]
    pub fn max_requests_per_minute(&self) -> u32 {
        self.max_requests_per_minute
    }

    /// Rolls both windows forward to `now`: resets the admission counter if
    /// more than one window length has elapsed since the window began, and
    /// purges outcomes older than the retention horizon. Must be called with
    /// the lock held, before any field is read.
    fn roll_windows(&self, inner: &mut StatsInternalState, now: Instant) {
        if now.duration_since(inner.window_started_at) > self.admission_window {
            inner.window_count = 0;
            inner.window_started_at = now;
        }

        let mut purged = false;
        while inner
            .outcomes
            .front()
            .is_some_and(|oldest| now.duration_since(oldest.recorded_at) > self.retention)
        {
            inner.outcomes.pop_front();
            purged = true;
        }
        if purged {
            Self::recompute_derived(inner);
        }
    }

    /// Recomputes the derived metrics from the retained outcome sequence.
    #[allow(clippy::cast_precision_loss)]
    fn recompute_derived(inner: &mut StatsInternalState) {
        let mut errors: u32 = 0;
        let mut total_ms: u128 = 0;
        for outcome in &inner.outcomes {
            if outcome.is_error {
                errors += 1;
            }
            total_ms += u128::from(outcome.response_time_ms);
        }
        inner.error_count = errors;
        inner.avg_response_time_ms = if inner.outcomes.is_empty() {
            EMPTY_WINDOW_AVG_MS
        } else {
            total_ms as f64 / inner.outcomes.len() as f64
        };
    }
}

impl std::fmt::Debug for ProviderStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ProviderStats")
            .field("max_requests_per_minute", &self.max_requests_per_minute)
            .field("requests_in_window", &snapshot.requests_in_window)
            .field("error_count", &snapshot.error_count)
            .field("avg_response_time_ms", &snapshot.avg_response_time_ms)
            .finish()
    }
}
