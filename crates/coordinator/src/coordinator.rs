//! Scan coordination - worker pool scheduling and supervision
//!
//! The concurrency ceiling is structural: exactly `min(concurrency_limit,
//! |ports|)` worker tasks are spawned and each runs one probe at a time,
//! so the limit cannot be exceeded by construction. Workers pull ports
//! from a shared cursor in ascending order and push results into a
//! bounded channel sized to the pool, which gives backpressure when the
//! consumer lags.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::progress::ScanProgress;
use crate::session::ScanSession;
use dragnet_common::{
    DragnetError, DragnetResult, PortResult, PortSet, Probe, ScanOptions, ScanStatus, ScanTarget,
    SessionState,
};

/// Hands out ports to workers in ascending order, each exactly once.
struct PortCursor {
    ports: PortSet,
    pos: AtomicUsize,
}

impl PortCursor {
    fn new(ports: PortSet) -> Self {
        Self {
            ports,
            pos: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> Option<u16> {
        let idx = self.pos.fetch_add(1, Ordering::Relaxed);
        self.ports.as_slice().get(idx).copied()
    }
}

/// Coordinates concurrent scans over a shared probe implementation.
pub struct ScanCoordinator {
    probe: Arc<dyn Probe>,
}

impl ScanCoordinator {
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self { probe }
    }

    /// Starts a scan and returns its session handle.
    ///
    /// Options are validated before any probe is dispatched; an invalid
    /// combination is rejected here and no session exists. Must be called
    /// from within a Tokio runtime.
    pub fn scan(
        &self,
        target: ScanTarget,
        ports: PortSet,
        options: ScanOptions,
    ) -> DragnetResult<ScanSession> {
        options.validate()?;

        let session_id = Uuid::new_v4();
        let ports_total = ports.len();
        let workers_n = options.concurrency_limit.min(ports_total);

        // Sessions cancel through a child token so that internal
        // cancellation (deadline, handle drop) never trips the caller's
        // own token.
        let token = options.cancel.clone().unwrap_or_default().child_token();

        let progress = Arc::new(ScanProgress::new(ports_total));
        let cursor = Arc::new(PortCursor::new(ports));
        let (result_tx, result_rx) = mpsc::channel(workers_n);
        let (state_tx, state_rx) = watch::channel(SessionState::Running);

        info!(
            "Starting scan {} target={} ports={} workers={}",
            session_id, target, ports_total, workers_n
        );

        let mut workers = JoinSet::new();
        for worker_id in 0..workers_n {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&self.probe),
                target.clone(),
                Arc::clone(&cursor),
                options.probe_timeout,
                Arc::clone(&progress),
                result_tx.clone(),
                token.clone(),
            ));
        }
        // Workers hold the only senders; the stream ends when they exit.
        drop(result_tx);

        let watchdog = options.deadline.map(|deadline| {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(deadline) => {
                        debug!("Scan {} hit its {:?} deadline, cancelling", session_id, deadline);
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        });

        let supervisor = tokio::spawn(supervise(
            session_id,
            workers,
            watchdog,
            Arc::clone(&progress),
            token.clone(),
            state_tx,
        ));

        Ok(ScanSession::new(
            session_id, target, result_rx, state_rx, progress, token, supervisor,
        ))
    }
}

/// Worker loop: pull the next port, probe it, forward the result.
///
/// Cancellation abandons the in-flight probe: its port counts as
/// dispatched but never completes, which the progress snapshot exposes.
#[allow(clippy::too_many_arguments)]
async fn run_worker(
    worker_id: usize,
    probe: Arc<dyn Probe>,
    target: ScanTarget,
    cursor: Arc<PortCursor>,
    probe_timeout: Duration,
    progress: Arc<ScanProgress>,
    results: mpsc::Sender<PortResult>,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let Some(port) = cursor.next() else { break };
        progress.record_dispatch();

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = probe.probe(&target, port, probe_timeout) => result,
        };
        progress.record_outcome(&result.outcome);

        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = results.send(result) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
    trace!(worker_id, "worker exited");
}

/// Joins the pool, derives the terminal status, and publishes it.
///
/// Workers are joined in completion order, so a crash surfaces while its
/// siblings are still running and the cancel reaches them mid-sweep.
/// Status comes from the coverage counters, not the token: the cleanup
/// cancel below would otherwise mislabel completed scans that carried a
/// deadline.
async fn supervise(
    session_id: Uuid,
    mut workers: JoinSet<()>,
    watchdog: Option<JoinHandle<()>>,
    progress: Arc<ScanProgress>,
    token: CancellationToken,
    state: watch::Sender<SessionState>,
) -> ScanStatus {
    let mut pool_failure: Option<DragnetError> = None;
    while let Some(joined) = workers.join_next().await {
        if let Err(err) = joined {
            // A dead worker means lost coverage; stop its siblings too.
            token.cancel();
            pool_failure
                .get_or_insert(DragnetError::WorkerPool(format!("worker task failed: {err}")));
        }
    }

    let snapshot = progress.snapshot();
    let status = if let Some(err) = pool_failure {
        ScanStatus::Failed(err)
    } else if snapshot.is_full_coverage() {
        ScanStatus::Completed
    } else {
        ScanStatus::Cancelled
    };

    let final_state = match &status {
        ScanStatus::Completed => SessionState::Completed,
        ScanStatus::Cancelled | ScanStatus::Failed(_) => SessionState::Cancelled,
    };
    state.send_replace(final_state);

    // Cleanup cancel reaps the deadline watchdog and wakes cancel waiters.
    token.cancel();
    if let Some(watchdog) = watchdog {
        let _ = watchdog.await;
    }

    debug!(
        "Scan {} finished: {} ({}/{} ports)",
        session_id, status, snapshot.completed, snapshot.ports_total
    );
    status
}
