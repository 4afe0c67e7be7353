use crate::frame_proto::FrameMessage;

/// A decoded message plus when it arrived.
#[derive(Debug, Clone)]
pub struct ReceivedFrame {
    pub message: FrameMessage,
    /// Microseconds since the Unix epoch at decode time.
    pub arrived_us: i64,
}

impl ReceivedFrame {
    /// Arrival minus send-time stamp, in milliseconds. Only meaningful when
    /// both clocks agree.
    pub fn latency_ms(&self) -> f64 {
        (self.arrived_us - self.message.timestamp_us) as f64 / 1_000.0
    }
}

/// What the receiver thread tells the UI.
#[derive(Debug)]
pub enum ViewerEvent {
    Connected { peer: String },
    Frame(ReceivedFrame),
    Disconnected { peer: String, reason: String },
}
