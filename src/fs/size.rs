//! Human-readable byte counts and transfer rates.

use std::time::Duration;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary (1024) steps, e.g. `1.5 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Format a transfer rate as `N.N KB/s` or, from 1024 KB/s up, `N.N MB/s`.
///
/// Zero elapsed time or zero bytes yields `"0 KB/s"`.
pub fn format_speed(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if bytes == 0 || secs <= 0.0 {
        return "0 KB/s".to_string();
    }

    let kib_per_sec = bytes as f64 / secs / 1024.0;
    if kib_per_sec < 1024.0 {
        format!("{:.1} KB/s", kib_per_sec)
    } else {
        format!("{:.1} MB/s", kib_per_sec / 1024.0)
    }
}
