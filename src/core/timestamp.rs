//! Timestamp formatting
//!
//! Trace formats pin ISO 8601 UTC with millisecond precision, the format
//! log aggregation systems expect.

use chrono::{DateTime, Utc};

/// Format a timestamp as ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
pub fn iso8601(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso8601_format() {
        let datetime = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123);
        assert_eq!(iso8601(&datetime), "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_epoch() {
        let datetime = Utc.timestamp_opt(0, 0).single().expect("valid epoch");
        assert_eq!(iso8601(&datetime), "1970-01-01T00:00:00.000Z");
    }
}
