use std::sync::Arc;

use crate::log::{log_level::LogLevel, log_sink::LogSink};

/// Discards everything.
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl NoopLogSink {
    pub fn shared() -> Arc<dyn LogSink> {
        Arc::new(Self)
    }
}

impl LogSink for NoopLogSink {
    #[inline]
    fn log(&self, _level: LogLevel, _msg: &str, _target: &'static str) {}
}
