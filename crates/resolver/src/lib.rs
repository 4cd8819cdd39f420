//! Host Resolver - turns a user-supplied host string into a scan target
//!
//! Accepted forms:
//! - IPv4 address: "192.168.1.10"
//! - IPv6 address: "::1"
//! - hostname: "example.com" (resolved via the system resolver)
//!
//! The scanning core requires a pre-resolved address; this is the one
//! place name resolution happens. IPv4 answers are preferred when a name
//! maps to both families.

use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

use dragnet_common::{DragnetError, DragnetResult, ScanTarget};

pub struct HostResolver;

impl HostResolver {
    /// Resolve a single host string into a [`ScanTarget`].
    ///
    /// Address literals pass through untouched. Hostnames go through one
    /// async lookup; the original name is kept on the target for display.
    pub async fn resolve(host: &str) -> DragnetResult<ScanTarget> {
        let host = host.trim();
        if host.is_empty() {
            return Err(DragnetError::InvalidTarget("no host specified".into()));
        }

        if let Ok(addr) = host.parse::<IpAddr>() {
            return Ok(ScanTarget::new(addr));
        }

        let addrs: Vec<IpAddr> = lookup_host((host, 0))
            .await
            .map_err(|e| DragnetError::InvalidTarget(format!("{host}: {e}")))?
            .map(|sock| sock.ip())
            .collect();

        let addr = addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                DragnetError::InvalidTarget(format!("{host}: lookup returned no addresses"))
            })?;

        debug!("Resolved {} to {}", host, addr);
        Ok(ScanTarget::named(addr, host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn ipv4_literal_passes_through() {
        let target = HostResolver::resolve("8.8.8.8").await.unwrap();
        assert_eq!(target.addr, IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
        assert!(target.hostname.is_none());
    }

    #[tokio::test]
    async fn ipv6_literal_passes_through() {
        let target = HostResolver::resolve("::1").await.unwrap();
        assert!(target.addr.is_ipv6());
    }

    #[tokio::test]
    async fn surrounding_whitespace_ignored() {
        let target = HostResolver::resolve("  127.0.0.1  ").await.unwrap();
        assert_eq!(target.addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn localhost_resolves_to_loopback() {
        let target = HostResolver::resolve("localhost").await.unwrap();
        assert!(target.addr.is_loopback());
        assert_eq!(target.hostname.as_deref(), Some("localhost"));
    }

    #[tokio::test]
    async fn empty_host_rejected() {
        let err = HostResolver::resolve("   ").await.unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn unresolvable_host_rejected() {
        // .invalid never resolves (RFC 2606), with or without a reachable
        // resolver.
        let err = HostResolver::resolve("no-such-host.invalid").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
