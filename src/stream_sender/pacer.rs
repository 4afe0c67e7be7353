use std::thread;
use std::time::Duration;

use crate::config::DEFAULT_PACING_US;

/// Open-loop pacing: sleep a fixed interval after every send.
///
/// The time spent waiting for the camera, encoding and sending is not
/// subtracted, so the real rate is always somewhat below `1 / interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(Duration::from_micros(DEFAULT_PACING_US))
    }
}

impl Pacer {
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub fn pace(&self) {
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
    }
}
