use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::output::print_results;
use dragnet_common::{PortResult, PortSet, ScanOptions, ScanStatus};
use dragnet_coordinator::ScanCoordinator;
use dragnet_probe_tcp::TcpProbe;
use dragnet_resolver::HostResolver;

pub async fn run_scan(
    target: String,
    ports: String,
    concurrency: usize,
    timeout_ms: u64,
    deadline: Option<u64>,
    output_format: String,
    show_all: bool,
) -> Result<()> {
    info!("Starting scan...");
    info!("Target: {}", target);
    info!("Ports: {}", ports);
    info!("Concurrency: {}", concurrency);

    let target = HostResolver::resolve(&target).await?;
    let ports: PortSet = ports.parse()?;
    info!("Resolved target: {}", target);
    info!("Port set: {} port(s)", ports.len());

    // Ctrl-C cancels the session through its options token; a second
    // Ctrl-C exits the process immediately.
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let mut options = ScanOptions::default()
        .with_concurrency_limit(concurrency)
        .with_probe_timeout(Duration::from_millis(timeout_ms))
        .with_cancel(cancel);
    if let Some(secs) = deadline {
        options = options.with_deadline(Duration::from_secs(secs));
    }

    let coordinator = ScanCoordinator::new(Arc::new(TcpProbe::new()));
    let scan_start = Instant::now();
    let mut session = coordinator.scan(target.clone(), ports, options)?;

    let mut results: Vec<PortResult> = Vec::new();
    while let Some(result) = session.next_result().await {
        if result.is_open() {
            info!("Port {} open ({}ms)", result.port, result.latency.as_millis());
        }
        results.push(result);
    }

    let snapshot = session.progress();
    let status = session.finish().await;
    let scan_duration = scan_start.elapsed();

    match &status {
        ScanStatus::Completed => {}
        ScanStatus::Cancelled => warn!(
            "Scan cancelled after {}/{} ports",
            snapshot.completed, snapshot.ports_total
        ),
        ScanStatus::Failed(err) => return Err(anyhow!("Scan failed: {err}")),
    }

    print_results(&target, &results, &status, &output_format, show_all, scan_duration)?;
    Ok(())
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling scan");
            cancel.cancel();
            // ctrl_c() replaces the default SIGINT disposition for the
            // rest of the process, so a forced exit has to be explicit.
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Second interrupt, exiting");
                std::process::exit(130);
            }
        }
    });
}
