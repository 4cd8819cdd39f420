//! Core traits for dragnet scanner components
//!
//! The probe seam is deliberately narrow: one port in, one classified
//! result out. Probes are infallible at the `Result` level; transport
//! failures are folded into `ProbeOutcome::Error` so a single bad port
//! never aborts a sweep.

use crate::types::{PortResult, ScanTarget};
use async_trait::async_trait;
use std::time::Duration;

/// Leaf probe - checks one port on one target.
///
/// Implementations must be cheap to share (`&self`) across the worker
/// pool, and must honor `timeout` as the upper bound on how long a single
/// probe may take.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe a single port, classifying whatever happens into a
    /// [`PortResult`].
    async fn probe(&self, target: &ScanTarget, port: u16, timeout: Duration) -> PortResult;

    /// Probe name/identifier
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProbeOutcome;
    use std::net::{IpAddr, Ipv4Addr};

    struct MockProbe;

    #[async_trait]
    impl Probe for MockProbe {
        async fn probe(&self, _target: &ScanTarget, port: u16, _timeout: Duration) -> PortResult {
            PortResult::new(port, ProbeOutcome::Open, Duration::from_millis(1))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn probe_trait_object_is_usable() {
        let probe: &dyn Probe = &MockProbe;
        let target = ScanTarget::new(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let result = probe.probe(&target, 80, Duration::from_secs(1)).await;
        assert_eq!(result.port, 80);
        assert!(result.is_open());
        assert_eq!(probe.name(), "mock");
    }
}
