use std::time::Duration;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Wall time of a run as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// Archive size in megabytes, rounded to two decimals for log fields.
pub fn archive_size_mb(len: usize) -> f64 {
    (len as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}
