//! Run statistics
//!
//! Tracks search volume, failure rates, judge outcomes and search latency for
//! one research run.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of latency samples kept
const LATENCY_WINDOW: usize = 100;

/// Counters shared by the schedulers of one run
pub struct Metrics {
    searches: AtomicU64,
    failed_searches: AtomicU64,
    timeouts: AtomicU64,
    waves: AtomicU64,
    judge_calls: AtomicU64,
    judge_no_expansion: AtomicU64,
    /// Most recent search latencies in ms
    response_times: RwLock<Vec<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            searches: AtomicU64::new(0),
            failed_searches: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            waves: AtomicU64::new(0),
            judge_calls: AtomicU64::new(0),
            judge_no_expansion: AtomicU64::new(0),
            response_times: RwLock::new(Vec::new()),
        }
    }

    /// Record a dispatched search and how long it took
    pub fn record_search(&self, time_ms: u64) {
        self.searches.fetch_add(1, Ordering::Relaxed);

        let mut times = self.response_times.write().unwrap_or_else(PoisonError::into_inner);
        if times.len() >= LATENCY_WINDOW {
            times.remove(0);
        }
        times.push(time_ms);
    }

    /// Record a search that ended in an error section
    pub fn record_failure(&self, timed_out: bool) {
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed wave
    pub fn record_wave(&self) {
        self.waves.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a judge call and whether it led to expansion
    pub fn record_judgment(&self, expanded: bool) {
        self.judge_calls.fetch_add(1, Ordering::Relaxed);
        if !expanded {
            self.judge_no_expansion.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Average search latency over the recent window
    pub fn avg_response_time(&self) -> Option<u64> {
        let times = self.response_times.read().unwrap_or_else(PoisonError::into_inner);
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Percentage of searches that succeeded
    pub fn reliability(&self) -> f64 {
        let total = self.searches.load(Ordering::Relaxed);
        let failed = self.failed_searches.load(Ordering::Relaxed);
        if total == 0 {
            100.0
        } else {
            (total.saturating_sub(failed) as f64 / total as f64) * 100.0
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            failed_searches: self.failed_searches.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            waves: self.waves.load(Ordering::Relaxed),
            judge_calls: self.judge_calls.load(Ordering::Relaxed),
            judge_no_expansion: self.judge_no_expansion.load(Ordering::Relaxed),
            avg_response_time: self.avg_response_time(),
            reliability: self.reliability(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub failed_searches: u64,
    pub timeouts: u64,
    pub waves: u64,
    pub judge_calls: u64,
    pub judge_no_expansion: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}
