//! Session handle for one running scan

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use crate::progress::ScanProgress;
use dragnet_common::{
    DragnetError, PortResult, ProgressSnapshot, ScanStatus, ScanTarget, SessionState,
};

/// Live handle to a scan started by the coordinator.
///
/// Results arrive lazily in completion order, via [`next_result`] or the
/// [`Stream`] impl. The handle is also the session's lifeline: dropping it
/// cancels all outstanding work.
///
/// [`next_result`]: ScanSession::next_result
pub struct ScanSession {
    id: Uuid,
    target: ScanTarget,
    results: mpsc::Receiver<PortResult>,
    state: watch::Receiver<SessionState>,
    progress: Arc<ScanProgress>,
    cancel: CancellationToken,
    supervisor: JoinHandle<ScanStatus>,
    _guard: DropGuard,
}

impl ScanSession {
    pub(crate) fn new(
        id: Uuid,
        target: ScanTarget,
        results: mpsc::Receiver<PortResult>,
        state: watch::Receiver<SessionState>,
        progress: Arc<ScanProgress>,
        cancel: CancellationToken,
        supervisor: JoinHandle<ScanStatus>,
    ) -> Self {
        let guard = cancel.clone().drop_guard();
        Self {
            id,
            target,
            results,
            state,
            progress,
            cancel,
            supervisor,
            _guard: guard,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    /// Current lifecycle state.
    ///
    /// Once the supervisor publishes a terminal state that value is final.
    /// While it still reads `Running`, full coverage of the port set means
    /// `Completed` and a tripped cancellation token means `Cancelled`, in
    /// that order: a finished scan stays `Completed` even though cleanup
    /// trips the token afterwards.
    #[must_use]
    pub fn state(&self) -> SessionState {
        let state = *self.state.borrow();
        if state.is_terminal() {
            return state;
        }
        if self.progress.snapshot().is_full_coverage() {
            return SessionState::Completed;
        }
        if self.cancel.is_cancelled() {
            return SessionState::Cancelled;
        }
        SessionState::Running
    }

    /// Counter snapshot for progress display.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Requests cancellation: no new ports are dispatched and in-flight
    /// probes are abandoned. Results already emitted remain valid, and the
    /// stream ends shortly after. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token observing this session's cancellation, for callers that want
    /// to select against it.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Next result in completion order, `None` once no more will arrive.
    pub async fn next_result(&mut self) -> Option<PortResult> {
        self.results.recv().await
    }

    /// Tears the session down and reports its terminal status.
    ///
    /// Outstanding work is cancelled first, so calling this without
    /// draining the stream means "drop the rest": the status is then
    /// `Cancelled` unless every probe had already finished.
    pub async fn finish(self) -> ScanStatus {
        let ScanSession {
            results,
            cancel,
            supervisor,
            _guard,
            ..
        } = self;

        cancel.cancel();
        drop(results);

        match supervisor.await {
            Ok(status) => status,
            Err(err) => {
                ScanStatus::Failed(DragnetError::WorkerPool(format!("supervisor failed: {err}")))
            }
        }
    }
}

impl fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSession")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Stream for ScanSession {
    type Item = PortResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().results.poll_recv(cx)
    }
}
