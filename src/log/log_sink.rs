use crate::log::log_level::LogLevel;

/// Destination for log lines.
///
/// Shared as `Arc<dyn LogSink>` between the capture loop, the sender and the
/// receiver thread, so implementations must not block for long.
pub trait LogSink: Send + Sync {
    /// `target` is the emitting module path, as filled in by the `sink_*` macros.
    fn log(&self, level: LogLevel, msg: &str, target: &'static str);
}
