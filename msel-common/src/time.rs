//! Timestamp utilities

use chrono::{DateTime, Local, Utc};

/// Event log timestamp layout (local wall-clock time)
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Format a timestamp the way event log lines carry it
pub fn log_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(LOG_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_millis_to_duration_zero() {
        assert_eq!(millis_to_duration(0), Duration::from_millis(0));
    }

    #[test]
    fn test_millis_to_duration_two_seconds() {
        let duration = millis_to_duration(2000);
        assert_eq!(duration, Duration::from_secs(2));
    }

    #[test]
    fn test_log_timestamp_layout() {
        let formatted = log_timestamp(now());
        assert_eq!(formatted.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&formatted, LOG_TIMESTAMP_FORMAT).is_ok());
    }
}
