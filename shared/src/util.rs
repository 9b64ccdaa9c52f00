/// Milliseconds in one day
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whole days elapsed between `earlier` and `now` (both millis), floored, never negative
pub fn days_between(earlier: i64, now: i64) -> i64 {
    ((now - earlier) / DAY_MS).max(0)
}

/// Parse an RFC 3339 timestamp into Unix millis
pub fn parse_rfc3339_millis(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Format Unix millis as an RFC 3339 string (UTC)
pub fn millis_to_rfc3339(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
