use std::time::SystemTime;

/// Milliseconds since the Unix epoch, used to stamp log lines.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Microseconds since the Unix epoch, used as the Frame Message timestamp.
///
/// Saturates at `i64::MAX`; a clock before the epoch yields 0.
pub fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
