//! Progress tracking
//!
//! Lock-free counters shared between the worker pool and the session
//! handle. `Relaxed` ordering is enough: snapshots are advisory and the
//! terminal status is only derived after the pool has been joined.

use dragnet_common::{ProbeOutcome, ProgressSnapshot};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct ScanProgress {
    ports_total: usize,
    dispatched: AtomicUsize,
    completed: AtomicUsize,
    open: AtomicUsize,
    closed: AtomicUsize,
    filtered: AtomicUsize,
    errors: AtomicUsize,
}

impl ScanProgress {
    pub fn new(ports_total: usize) -> Self {
        Self {
            ports_total,
            dispatched: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            open: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            filtered: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        }
    }

    /// A port was handed to a worker.
    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// A probe reached a terminal outcome.
    pub fn record_outcome(&self, outcome: &ProbeOutcome) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        let bucket = match outcome {
            ProbeOutcome::Open => &self.open,
            ProbeOutcome::Closed => &self.closed,
            ProbeOutcome::Filtered => &self.filtered,
            ProbeOutcome::Error(_) => &self.errors,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            ports_total: self.ports_total,
            dispatched: self.dispatched.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            open: self.open.load(Ordering::Relaxed),
            closed: self.closed.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
