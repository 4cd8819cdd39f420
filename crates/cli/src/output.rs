//! Output formatting for scan results

use anyhow::Result;
use std::time::Duration;

use dragnet_common::{PortResult, ProbeOutcome, ScanStatus, ScanTarget};

/// Print scan results in the specified format
pub fn print_results(
    target: &ScanTarget,
    results: &[PortResult],
    status: &ScanStatus,
    format: &str,
    show_all: bool,
    scan_duration: Duration,
) -> Result<()> {
    let format = format.trim().to_lowercase();
    match format.as_str() {
        "json" | "j" => print_json(target, results, status, scan_duration)?,
        "csv" | "c" => print_csv(results),
        "table" | "text" | "t" | "" => print_table(target, results, status, show_all, scan_duration),
        _ => {
            eprintln!("Warning: Unknown format '{}', using default table format", format);
            print_table(target, results, status, show_all, scan_duration);
        }
    }
    Ok(())
}

/// Print results as an ASCII table, sorted by port.
///
/// By default only open ports get a row; a sweep over a mostly closed
/// host would otherwise drown the interesting lines. `show_all` lists
/// every outcome. The summary always counts everything and is printed
/// even when no probe completed, so a cancelled scan still reports its
/// status and duration.
fn print_table(
    target: &ScanTarget,
    results: &[PortResult],
    status: &ScanStatus,
    show_all: bool,
    scan_duration: Duration,
) {
    let mut sorted_results = results.to_vec();
    sorted_results.sort_by_key(|r| r.port);

    println!("\nScan report for {}", target);
    println!("{:-<60}", "");
    if sorted_results.is_empty() {
        println!("No results to display.");
    } else {
        println!("{:<8} {:<10} {:<10} {:<28}", "PORT", "STATE", "LATENCY", "DETAIL");
        println!("{:-<60}", "");
    }

    let mut open_count = 0;
    let mut closed_count = 0;
    let mut filtered_count = 0;
    let mut error_count = 0;

    for result in &sorted_results {
        let detail = match &result.outcome {
            ProbeOutcome::Open => {
                open_count += 1;
                String::new()
            }
            ProbeOutcome::Closed => {
                closed_count += 1;
                String::new()
            }
            ProbeOutcome::Filtered => {
                filtered_count += 1;
                String::new()
            }
            ProbeOutcome::Error(reason) => {
                error_count += 1;
                truncate(reason, 28)
            }
        };

        if result.is_open() || show_all {
            println!(
                "{:<8} {:<10} {:<10} {:<28}",
                result.port,
                result.outcome,
                format!("{}ms", result.latency.as_millis()),
                detail
            );
        }
    }

    println!("{:-<60}", "");
    println!("\n📊 Summary:");
    println!("  Status: {}", status);
    println!("  Total probed: {}", results.len());
    println!("  ✓ Open ports: {}", open_count);
    println!("  ✗ Closed ports: {}", closed_count);
    println!("  ⊘ Filtered: {}", filtered_count);
    if error_count > 0 {
        println!("  ⚠ Errors: {}", error_count);
    }
    println!("  ⏱️  Scan duration: {}", format_duration(scan_duration));
    println!();
}

/// Print results as JSON
fn print_json(
    target: &ScanTarget,
    results: &[PortResult],
    status: &ScanStatus,
    scan_duration: Duration,
) -> Result<()> {
    use serde_json::json;

    let mut sorted_results = results.to_vec();
    sorted_results.sort_by_key(|r| r.port);
    let rows = sorted_results
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    let output = json!({
        "scan_info": {
            "target": target.to_string(),
            "addr": target.addr.to_string(),
            "status": status.to_string(),
            "duration_seconds": scan_duration.as_secs_f64(),
            "duration_formatted": format_duration(scan_duration),
            "total_probed": results.len(),
        },
        "results": rows,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as CSV
fn print_csv(results: &[PortResult]) {
    println!("port,state,latency_ms,detail");

    let mut sorted_results = results.to_vec();
    sorted_results.sort_by_key(|r| r.port);

    for result in &sorted_results {
        let detail = match &result.outcome {
            ProbeOutcome::Error(reason) => {
                let escaped = reason.replace('"', "\"\"").replace('\n', " ").replace('\r', "");
                format!("\"{}\"", escaped)
            }
            _ => String::from("\"\""),
        };

        println!(
            "{},{},{},{}",
            result.port,
            result.outcome,
            result.latency.as_millis(),
            detail
        );
    }
}

/// Shortens `s` to at most `max` bytes, ending in `...`.
///
/// Error reasons carry OS text that may be non-ASCII, so the cut must
/// land on a char boundary, never inside a multi-byte sequence.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max.saturating_sub(3);
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

/// Format duration in a human-readable way
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs == 0 {
        format!("{}ms", millis)
    } else if total_secs < 60 {
        if millis > 0 {
            format!("{}.{:03}s", total_secs, millis)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn sample_results() -> Vec<PortResult> {
        vec![
            PortResult::new(443, ProbeOutcome::Closed, Duration::from_millis(2)),
            PortResult::new(80, ProbeOutcome::Open, Duration::from_millis(10)),
            PortResult::new(8080, ProbeOutcome::Filtered, Duration::from_millis(1000)),
            PortResult::new(
                22,
                ProbeOutcome::Error("connect: \"network\" unreachable".into()),
                Duration::from_millis(1),
            ),
        ]
    }

    fn sample_target() -> ScanTarget {
        ScanTarget::named(IpAddr::V4(Ipv4Addr::LOCALHOST), "localhost")
    }

    #[test]
    fn test_print_results_json() {
        let json_result = print_json(
            &sample_target(),
            &sample_results(),
            &ScanStatus::Completed,
            Duration::from_secs(5),
        );
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_print_results_csv() {
        print_csv(&sample_results());
    }

    #[test]
    fn test_print_results_table() {
        print_table(
            &sample_target(),
            &sample_results(),
            &ScanStatus::Cancelled,
            false,
            Duration::from_secs(5),
        );
        print_table(
            &sample_target(),
            &sample_results(),
            &ScanStatus::Completed,
            true,
            Duration::from_secs(5),
        );
    }

    #[test]
    fn test_empty_results_keep_the_summary() {
        print_table(
            &sample_target(),
            &[],
            &ScanStatus::Cancelled,
            false,
            Duration::from_millis(250),
        );
    }

    #[test]
    fn test_unknown_format_falls_back() {
        let result = print_results(
            &sample_target(),
            &sample_results(),
            &ScanStatus::Completed,
            "yaml",
            false,
            Duration::from_secs(1),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_truncate_long_detail() {
        let long = "x".repeat(60);
        let out = truncate(&long, 28);
        assert!(out.len() <= 28);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte_detail() {
        // Localized connect-error text, as the OS can hand back.
        let reason = "ネットワークに到達できません (os error 101)";
        let out = truncate(reason, 28);
        assert!(out.len() <= 28);
        assert!(out.ends_with("..."));
        assert!(reason.starts_with(out.trim_end_matches("...")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(5500)), "5.500s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
    }
}
