//! Memory and timing profiling utilities
//!
//! - Memory: Reads RSS (Resident Set Size) from /proc/self/status
//! - Timing: Uses std::time::Instant for precise measurements
//!
//! Everything reports through `tracing::debug!`, so it only shows with `-vv`
//! or `RUST_LOG=debug`.

use std::fs;
use std::time::Instant;

/// Get current RSS (Resident Set Size) in bytes from /proc/self/status
///
/// Returns 0 where procfs is unavailable.
pub fn get_rss_bytes() -> u64 {
    fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| parse_vm_rss(&status))
        .unwrap_or(0)
}

/// Extract VmRSS in bytes from the contents of /proc/self/status
fn parse_vm_rss(status: &str) -> Option<u64> {
    // Format: "VmRSS:    123456 kB"
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb = line.split_whitespace().nth(1)?.parse::<u64>().ok()?;
    Some(kb * 1024)
}

/// Get current RSS in megabytes
pub fn get_rss_mb() -> f64 {
    get_rss_bytes() as f64 / (1024.0 * 1024.0)
}

/// Memory checkpoint that returns the value for comparison
pub fn checkpoint(label: &str) -> f64 {
    let rss = get_rss_mb();
    tracing::debug!("MEMPROF [{:.2} MB]: {}", rss, label);
    rss
}

/// Log the change since a previous checkpoint
pub fn delta(label: &str, previous: f64) -> f64 {
    let current = get_rss_mb();
    tracing::debug!(
        "MEMPROF [{:.2} MB] (delta: {:+.2} MB): {}",
        current,
        current - previous,
        label
    );
    current
}

/// Log elapsed time with delta from the previous checkpoint
pub fn time_delta(label: &str, start: Instant, section_start: Instant) -> Instant {
    tracing::debug!(
        "TIMEPROF: {} [+{:.3}s, total: {:.3}s]",
        label,
        section_start.elapsed().as_secs_f64(),
        start.elapsed().as_secs_f64()
    );
    Instant::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\tpix-exhibits\nVmPeak:\t  2000 kB\nVmRSS:\t  1536 kB\n";
        assert_eq!(parse_vm_rss(status), Some(1536 * 1024));
        assert_eq!(parse_vm_rss("Name:\tx\n"), None);
        assert_eq!(parse_vm_rss("VmRSS: lots kB"), None);
    }

    #[test]
    fn test_checkpoints_chain() {
        let m0 = checkpoint("start");
        let m1 = delta("middle", m0);
        assert!(m1 >= 0.0);

        let t0 = Instant::now();
        let t1 = time_delta("middle", t0, t0);
        let t2 = time_delta("end", t0, t1);
        assert!(t1 >= t0 && t2 >= t1);
    }
}
