use std::collections::VecDeque;

use super::{ReceivedFrame, ViewerEvent};

const MAX_UI_LOGS: usize = 256;

/// Everything the viewer window shows, kept apart from egui so it can be
/// driven without a display.
#[derive(Debug, Default)]
pub struct ViewerState {
    pub peer: Option<String>,
    pub frames_received: u64,
    pub last_latency_ms: Option<f64>,
    pub last_format: Option<String>,
    pub status_line: String,
    pub logs: VecDeque<String>,
    /// Newest drawable RGB frame not yet uploaded to the GPU.
    pending: Option<ReceivedFrame>,
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            status_line: "Waiting for a sender.".into(),
            ..Self::default()
        }
    }

    pub fn push_log<T: Into<String>>(&mut self, line: T) {
        if self.logs.len() == MAX_UI_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn apply(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::Connected { peer } => {
                self.status_line = format!("Receiving from {peer}");
                self.push_log(format!("[net] connected: {peer}"));
                self.peer = Some(peer);
                self.frames_received = 0;
                self.last_latency_ms = None;
            }
            ViewerEvent::Frame(frame) => {
                self.frames_received += 1;
                self.last_latency_ms = Some(frame.latency_ms());
                let msg = &frame.message;
                if self.last_format.as_deref() != Some(msg.format.as_str()) {
                    self.last_format = Some(msg.format.clone());
                }
                if msg.has_tight_rgb_payload() {
                    // Older undrawn frames are simply replaced.
                    self.pending = Some(frame);
                } else {
                    self.status_line = format!(
                        "Frame {}x{} '{}' ({} bytes) cannot be drawn",
                        msg.width,
                        msg.height,
                        msg.format,
                        msg.pixels.len()
                    );
                }
            }
            ViewerEvent::Disconnected { peer, reason } => {
                self.status_line = format!("{peer} disconnected: {reason}. Waiting for a sender.");
                self.push_log(format!("[net] {peer}: {reason}"));
                self.peer = None;
            }
        }
    }

    /// Take the newest drawable frame, if one arrived since the last call.
    pub fn take_pending(&mut self) -> Option<ReceivedFrame> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::frame_proto::FrameMessage;

    fn frame(ts: i64, format: &str, pixels: usize) -> ViewerEvent {
        ViewerEvent::Frame(ReceivedFrame {
            message: FrameMessage {
                timestamp_us: ts,
                width: 2,
                height: 1,
                format: format.into(),
                pixels: vec![0; pixels],
            },
            arrived_us: ts + 4_000,
        })
    }

    #[test]
    fn keeps_only_newest_drawable_frame() {
        let mut s = ViewerState::new();
        s.apply(ViewerEvent::Connected { peer: "10.0.0.2:5000".into() });
        s.apply(frame(1, "RGB", 6));
        s.apply(frame(2, "RGB", 6));

        assert_eq!(s.frames_received, 2);
        assert_eq!(s.last_latency_ms, Some(4.0));
        assert_eq!(s.take_pending().unwrap().message.timestamp_us, 2);
        assert!(s.take_pending().is_none());
    }

    #[test]
    fn undrawable_frames_are_counted_not_queued() {
        let mut s = ViewerState::new();
        s.apply(frame(1, "YUYV", 4));
        assert_eq!(s.frames_received, 1);
        assert!(s.take_pending().is_none());
        assert!(s.status_line.contains("'YUYV'"));
        assert_eq!(s.last_format.as_deref(), Some("YUYV"));
    }

    #[test]
    fn disconnect_resets_peer_and_logs() {
        let mut s = ViewerState::new();
        s.apply(ViewerEvent::Connected { peer: "a".into() });
        s.apply(ViewerEvent::Disconnected {
            peer: "a".into(),
            reason: "peer closed".into(),
        });
        assert!(s.peer.is_none());
        assert_eq!(s.logs.back().map(String::as_str), Some("[net] a: peer closed"));
    }
}
