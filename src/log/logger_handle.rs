use std::sync::mpsc;

use crate::{
    log::{log_level::LogLevel, log_record::LogRecord, log_sink::LogSink},
    utils::now_millis,
};

/// Cloneable, non-blocking handle onto the logger queue.
///
/// If the queue is full the line is dropped rather than stalling the caller;
/// the capture loop must never wait on disk I/O.
#[derive(Clone)]
pub struct LoggerHandle {
    pub(super) tx: mpsc::SyncSender<LogRecord>,
    pub(super) min_level: LogLevel,
}

impl LogSink for LoggerHandle {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let _ = self.try_log(level, msg, target);
    }
}

impl LoggerHandle {
    /// Enqueue a line without blocking.
    ///
    /// Lines below the handle's minimum level are discarded and count as sent.
    ///
    /// # Errors
    /// - `TrySendError::Full` when the queue is at capacity.
    /// - `TrySendError::Disconnected` when the writer thread is gone.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogRecord>> {
        if level < self.min_level {
            return Ok(());
        }
        self.tx
            .try_send(LogRecord::new(level, text, target, now_millis()))
    }
}
