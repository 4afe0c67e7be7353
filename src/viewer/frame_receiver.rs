use std::io::{self, BufReader, Read};
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::frame_proto::{DecodeLimits, FrameError, read_message};
use crate::log::log_sink::LogSink;
use crate::utils::now_micros;
use crate::{sink_info, sink_warn};

use super::{ReceivedFrame, ViewerEvent};

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Clean close between messages.
    PeerClosed,
    /// Bad framing, or the connection dropped mid-message.
    Failed(FrameError),
    /// The UI side hung up.
    ViewerGone,
}

/// Reads Frame Messages from one connected sender.
pub struct ReceiverSession<R: Read> {
    peer: String,
    stream: R,
    limits: DecodeLimits,
    log: Arc<dyn LogSink>,
}

impl<R: Read> ReceiverSession<R> {
    pub fn new(
        peer: impl Into<String>,
        stream: R,
        limits: DecodeLimits,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            peer: peer.into(),
            stream,
            limits,
            log,
        }
    }

    /// Forward every message to `tx` until the stream ends.
    ///
    /// Returns the end reason and the number of frames forwarded.
    pub fn run(mut self, tx: &Sender<ViewerEvent>) -> (SessionEnd, u64) {
        let mut frames = 0;
        if tx.send(ViewerEvent::Connected { peer: self.peer.clone() }).is_err() {
            return (SessionEnd::ViewerGone, frames);
        }

        let end = loop {
            match read_message(&mut self.stream, &self.limits) {
                Ok(message) => {
                    let frame = ReceivedFrame {
                        message,
                        arrived_us: now_micros(),
                    };
                    if tx.send(ViewerEvent::Frame(frame)).is_err() {
                        break SessionEnd::ViewerGone;
                    }
                    frames += 1;
                }
                Err(e) if e.is_eof() => break SessionEnd::PeerClosed,
                Err(e) => break SessionEnd::Failed(e),
            }
        };

        let reason = match &end {
            SessionEnd::PeerClosed => "peer closed".to_owned(),
            SessionEnd::Failed(e) => e.to_string(),
            SessionEnd::ViewerGone => "viewer closed".to_owned(),
        };
        match &end {
            SessionEnd::Failed(_) => {
                sink_warn!(self.log, "{}: {reason} after {frames} frames", self.peer);
            }
            _ => sink_info!(self.log, "{}: {reason} after {frames} frames", self.peer),
        }
        let _ = tx.send(ViewerEvent::Disconnected {
            peer: self.peer,
            reason,
        });
        (end, frames)
    }
}

/// Listening side of the stream. Serves one sender at a time.
pub struct FrameReceiver {
    listener: TcpListener,
    limits: DecodeLimits,
    log: Arc<dyn LogSink>,
}

impl FrameReceiver {
    pub fn bind<A: ToSocketAddrs>(
        addr: A,
        limits: DecodeLimits,
        log: Arc<dyn LogSink>,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        sink_info!(log, "listening on {}", listener.local_addr()?);
        Ok(Self { listener, limits, log })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Block until a sender connects.
    pub fn accept_one(&self) -> io::Result<ReceiverSession<BufReader<std::net::TcpStream>>> {
        let (stream, peer) = self.listener.accept()?;
        sink_info!(self.log, "accepted {peer}");
        Ok(ReceiverSession::new(
            peer.to_string(),
            BufReader::new(stream),
            self.limits,
            Arc::clone(&self.log),
        ))
    }

    /// Accept and drain senders one after another until the UI goes away.
    pub fn serve(self, tx: &Sender<ViewerEvent>) -> io::Result<()> {
        loop {
            let session = self.accept_one()?;
            if let (SessionEnd::ViewerGone, _) = session.run(tx) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::frame_proto::{ProtoError, encode_message};
    use crate::log::NoopLogSink;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn session_over(peer: &str, wire: Vec<u8>) -> ReceiverSession<Cursor<Vec<u8>>> {
        ReceiverSession::new(
            peer,
            Cursor::new(wire),
            DecodeLimits::default(),
            NoopLogSink::shared(),
        )
    }

    #[test]
    fn forwards_frames_then_reports_clean_close() {
        let mut wire = encode_message(100, 1, 1, b"RGB", &[1, 2, 3]).unwrap().to_vec();
        wire.extend_from_slice(&encode_message(200, 1, 1, b"RGB", &[4, 5, 6]).unwrap());
        let (tx, rx) = mpsc::channel();

        let session = session_over("test", wire);
        let (end, frames) = session.run(&tx);
        drop(tx);

        assert!(matches!(end, SessionEnd::PeerClosed));
        assert_eq!(frames, 2);
        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], ViewerEvent::Connected { peer } if peer == "test"));
        match &events[2] {
            ViewerEvent::Frame(f) => {
                assert_eq!(f.message.timestamp_us, 200);
                assert!(f.latency_ms() > 0.0);
            }
            other => panic!("expected Frame, got {other:?}"),
        }
        assert!(matches!(
            &events[3],
            ViewerEvent::Disconnected { reason, .. } if reason == "peer closed"
        ));
    }

    #[test]
    fn garbage_ends_session_with_protocol_error() {
        let (tx, _rx) = mpsc::channel();
        let session = session_over("junk", vec![0u8; 64]);
        match session.run(&tx) {
            (SessionEnd::Failed(FrameError::Proto(ProtoError::BadMagic(0))), 0) => {}
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn stops_when_viewer_is_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let wire = encode_message(1, 1, 1, b"RGB", &[0, 0, 0]).unwrap().to_vec();
        let session = session_over("x", wire);
        assert!(matches!(session.run(&tx), (SessionEnd::ViewerGone, 0)));
    }
}
