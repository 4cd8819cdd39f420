//! TCP connect probe implementation

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tracing::{instrument, trace};

use dragnet_common::{PortResult, Probe, ProbeOutcome, ScanTarget};

/// Full-handshake TCP connect probe.
///
/// Stateless and cheap to share; one instance serves an entire worker
/// pool. The connection is dropped as soon as the outcome is known, which
/// sends an orderly FIN for opened ports.
#[derive(Debug, Default)]
pub struct TcpProbe;

impl TcpProbe {
    pub fn new() -> Self {
        Self
    }
}

/// Maps an OS connect error to a port outcome.
///
/// Refusal means a listener-less port answered with RST. An OS-level
/// timeout means something dropped our SYN, same as the probe-level
/// timeout. Everything else is a transport failure worth surfacing
/// verbatim: unreachable networks, permission errors, fd exhaustion.
fn classify_connect_error(err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeOutcome::Closed,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeOutcome::Filtered,
        _ => ProbeOutcome::Error(err.to_string()),
    }
}

#[async_trait]
impl Probe for TcpProbe {
    /// Probe one port, classifying the connect result.
    ///
    /// Never exceeds `timeout`: an unanswered SYN is cut off by the timer
    /// and reported as `Filtered`.
    #[instrument(skip(self, target), fields(addr = %target.addr, port))]
    async fn probe(&self, target: &ScanTarget, port: u16, timeout_budget: Duration) -> PortResult {
        let addr = SocketAddr::new(target.addr, port);
        let start = Instant::now();

        let outcome = match timeout(timeout_budget, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeOutcome::Open
            }
            Ok(Err(err)) => classify_connect_error(&err),
            Err(_) => ProbeOutcome::Filtered,
        };

        let latency = start.elapsed();
        trace!(outcome = %outcome, latency_ms = latency.as_millis() as u64, "probe finished");
        PortResult::new(port, outcome, latency)
    }

    fn name(&self) -> &str {
        "tcp-connect"
    }
}
