use std::sync::Arc;

use crate::log::{log_level::LogLevel, log_sink::LogSink};

/// Forwards everything to an inner sink and also prints Warn/Error to stderr,
/// so setup failures are visible even when nobody reads the log file.
pub struct StderrEcho {
    inner: Arc<dyn LogSink>,
    prefix: &'static str,
}

impl StderrEcho {
    pub fn new(prefix: &'static str, inner: Arc<dyn LogSink>) -> Self {
        Self { inner, prefix }
    }
}

impl LogSink for StderrEcho {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        if level.is_problem() {
            eprintln!("[{}] {level}: {msg}", self.prefix);
        }
        self.inner.log(level, msg, target);
    }
}
