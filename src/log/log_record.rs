use crate::log::log_level::LogLevel;

/// A single queued log line.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Milliseconds since the Unix epoch.
    pub ts_ms: u128,
    pub text: String,
    /// Module path of the call site.
    pub target: &'static str,
}

impl LogRecord {
    pub fn new(
        level: LogLevel,
        text: impl Into<String>,
        target: &'static str,
        ts_ms: u128,
    ) -> Self {
        Self {
            level,
            ts_ms,
            text: text.into(),
            target,
        }
    }

    /// File line format: `[LEVEL] ts_ms target | text`.
    pub fn file_line(&self) -> String {
        format!("[{}] {} {} | {}", self.level, self.ts_ms, self.target, self.text)
    }
}
