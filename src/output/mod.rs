//! Worker summaries
//!
//! - `text`: human-readable summary through the logger
//! - `json`: per-worker JSON file for job bookkeeping

pub mod json;
pub mod text;

use std::time::Duration;

/// Format a duration for humans (`850ms`, `12.4s`, `3.52m`, `1.07h`)
pub fn format_duration_human(d: Duration) -> String {
    let millis = d.as_millis() as u64;

    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", millis as f64 / 1000.0)
    } else if millis < 3_600_000 {
        format!("{:.2}m", millis as f64 / 60_000.0)
    } else {
        format!("{:.2}h", millis as f64 / 3_600_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_human() {
        assert_eq!(format_duration_human(Duration::ZERO), "0ms");
        assert_eq!(format_duration_human(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration_human(Duration::from_millis(12_400)), "12.4s");
        assert_eq!(format_duration_human(Duration::from_secs(90)), "1.50m");
        assert_eq!(format_duration_human(Duration::from_secs(7200)), "2.00h");
    }
}
