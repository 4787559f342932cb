use chrono::{DateTime, Utc};

/// Truncate a title to `max` characters, appending an ellipsis when cut.
/// Counts characters, not bytes, so multibyte input stays valid.
pub fn truncate_title(s: &str, max: usize) -> String {
    let s = s.trim();
    let mut single_line = s.lines().next().unwrap_or("").trim().to_string();
    if s.lines().count() > 1 {
        single_line.push('…');
        return truncate_chars(&single_line, max);
    }
    truncate_chars(&single_line, max)
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push('…');
        out
    }
}

/// Epoch values at or above this magnitude are milliseconds; below, seconds.
/// 10^12 seconds is the year 33658, 10^12 milliseconds is 2001.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Convert a source-reported epoch integer to RFC 3339, detecting second vs
/// millisecond resolution by magnitude.
pub fn epoch_to_rfc3339(epoch: i64) -> Option<String> {
    let dt: DateTime<Utc> = if epoch.abs() >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)?
    } else {
        DateTime::from_timestamp(epoch, 0)?
    };
    Some(dt.to_rfc3339())
}

/// RFC 3339 for a filesystem time, the fallback when a format carries no
/// timestamps of its own.
pub fn system_time_to_rfc3339(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_title("fix bug", 100), "fix bug");
    }

    #[test]
    fn truncate_cuts_at_char_boundary_with_ellipsis() {
        let long = "x".repeat(150);
        let out = truncate_title(&long, 100);
        assert_eq!(out.chars().count(), 101);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncate_collapses_to_first_line() {
        let out = truncate_title("first line\nsecond line", 100);
        assert!(out.starts_with("first line"));
        assert!(!out.contains("second"));
    }

    #[test]
    fn epoch_threshold_detects_resolution() {
        // 2021-01-01T00:00:00Z in seconds and milliseconds
        let from_secs = epoch_to_rfc3339(1_609_459_200).unwrap();
        let from_millis = epoch_to_rfc3339(1_609_459_200_000).unwrap();
        assert!(from_secs.starts_with("2021-01-01"));
        assert!(from_millis.starts_with("2021-01-01"));
    }
}
