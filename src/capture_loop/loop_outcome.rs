use crate::stream_sender::SendError;

/// Why the loop stopped without a driver or display failure.
#[derive(Debug)]
pub enum StopReason {
    /// Window closed or Esc pressed.
    WindowClosed,
    /// The downstream peer stopped accepting data. A normal end of stream.
    PeerGone(SendError),
    /// The configured frame limit was reached.
    MaxFrames,
}

#[derive(Debug)]
pub struct LoopOutcome {
    pub frames_sent: u64,
    pub stop: StopReason,
}
