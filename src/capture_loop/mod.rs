//! The single-threaded capture, send, pace and render loop.
pub mod capture_loop;
pub mod loop_error;
pub mod loop_outcome;

pub use capture_loop::{LoopOptions, run_capture_loop};
pub use loop_error::LoopError;
pub use loop_outcome::{LoopOutcome, StopReason};
