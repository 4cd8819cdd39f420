//! Core data types for the dragnet scanner
//!
//! Everything here is plain data shared across the workspace: the probe
//! and coordinator crates produce it, the presentation layer consumes it.
//! Conventions:
//! - small helpers are `#[inline]` and `#[must_use]`
//! - builder-style methods consume `self` to avoid extra clones
//! - results are immutable once produced and serde-friendly

use crate::error::DragnetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default ceiling for simultaneously in-flight probes.
pub const DEFAULT_CONCURRENCY: usize = 500;

/// Default per-port connect timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

/// The host under scan, resolved ahead of time by the caller.
///
/// The scanning core performs no name resolution of its own; it connects
/// to `addr` exactly as given. `hostname` is the user-supplied name the
/// address was resolved from, kept for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    pub addr: IpAddr,
    pub hostname: Option<String>,
}

impl ScanTarget {
    #[inline]
    #[must_use]
    pub fn new(addr: IpAddr) -> Self {
        Self {
            addr,
            hostname: None,
        }
    }

    /// Target that remembers the name it was resolved from.
    #[inline]
    #[must_use]
    pub fn named(addr: IpAddr, hostname: impl Into<String>) -> Self {
        Self {
            addr,
            hostname: Some(hostname.into()),
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hostname {
            Some(name) => write!(f, "{} ({})", name, self.addr),
            None => write!(f, "{}", self.addr),
        }
    }
}

/// Terminal classification of a single connect probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// TCP handshake completed.
    Open,
    /// Peer actively refused the connection.
    Closed,
    /// No response before the timeout elapsed, typically a silent drop.
    Filtered,
    /// Transport failure distinct from the other three, with its cause.
    Error(String),
}

impl ProbeOutcome {
    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, ProbeOutcome::Open)
    }

    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, ProbeOutcome::Closed)
    }

    #[inline]
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        matches!(self, ProbeOutcome::Filtered)
    }

    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, ProbeOutcome::Error(_))
    }

    /// Short lowercase label, shared by every output format.
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Open => "open",
            ProbeOutcome::Closed => "closed",
            ProbeOutcome::Filtered => "filtered",
            ProbeOutcome::Error(_) => "error",
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of probing a single port. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    pub port: u16,
    pub outcome: ProbeOutcome,
    /// Time from dispatch to the terminal condition.
    pub latency: Duration,
}

impl PortResult {
    #[inline]
    #[must_use]
    pub fn new(port: u16, outcome: ProbeOutcome, latency: Duration) -> Self {
        Self {
            port,
            outcome,
            latency,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.outcome.is_open()
    }
}

/// Scan behaviour tuning options.
///
/// `cancel` is an externally owned token: cancelling it stops any session
/// it was passed to. Sessions operate on a child of this token, so internal
/// cancellation (deadline, handle drop) never propagates back to the
/// caller's own token.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Hard ceiling on simultaneously in-flight probes.
    pub concurrency_limit: usize,
    /// Budget for a single connect attempt.
    pub probe_timeout: Duration,
    /// Wall-clock budget for the whole sweep; unlimited when `None`.
    pub deadline: Option<Duration>,
    /// Caller-side cancellation handle, e.g. wired to an interrupt signal.
    pub cancel: Option<CancellationToken>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            deadline: None,
            cancel: None,
        }
    }
}

impl ScanOptions {
    #[inline]
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Rejects option combinations no scan may start with.
    pub fn validate(&self) -> Result<(), DragnetError> {
        if self.concurrency_limit == 0 {
            return Err(DragnetError::InvalidOptions(
                "concurrency_limit must be at least 1".into(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(DragnetError::InvalidOptions(
                "probe_timeout must be non-zero".into(),
            ));
        }
        if matches!(self.deadline, Some(d) if d.is_zero()) {
            return Err(DragnetError::InvalidOptions(
                "deadline must be non-zero when set".into(),
            ));
        }
        Ok(())
    }
}

/// Session lifecycle. `Running` moves to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    Completed,
    Cancelled,
}

impl SessionState {
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Running)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Terminal report for one scan, produced exactly once per session.
#[derive(Debug)]
pub enum ScanStatus {
    /// Every requested port yielded a result.
    Completed,
    /// Cancelled before full coverage; results already emitted stay valid.
    Cancelled,
    /// A coordinator-level resource failure aborted the scan.
    Failed(DragnetError),
}

impl ScanStatus {
    #[inline]
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, ScanStatus::Completed)
    }

    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, ScanStatus::Cancelled)
    }

    #[inline]
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, ScanStatus::Failed(_))
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Completed => f.write_str("completed"),
            ScanStatus::Cancelled => f.write_str("cancelled"),
            ScanStatus::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Point-in-time view of a session's counters.
///
/// `dispatched` counts ports handed to a worker; `completed` counts probes
/// that reached a terminal outcome. The two diverge while probes are in
/// flight, and stay diverged after cancellation abandons work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub ports_total: usize,
    pub dispatched: usize,
    pub completed: usize,
    pub open: usize,
    pub closed: usize,
    pub filtered: usize,
    pub errors: usize,
}

impl ProgressSnapshot {
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.dispatched.saturating_sub(self.completed)
    }

    /// True when every requested port reached a terminal outcome.
    #[inline]
    #[must_use]
    pub fn is_full_coverage(&self) -> bool {
        self.completed == self.ports_total
    }

    /// Completion percentage in [0.0, 100.0].
    #[inline]
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.ports_total == 0 {
            0.0
        } else {
            (self.completed as f32 / self.ports_total as f32) * 100.0
        }
    }
}
