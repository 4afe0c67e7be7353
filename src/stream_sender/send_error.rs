use std::{fmt, io};

/// Failures of [`StreamSender::send_frame`](super::StreamSender::send_frame).
///
/// All of them end the send loop; none is retried.
#[derive(Debug)]
pub enum SendError {
    /// The transport accepted fewer bytes than requested and reported no error.
    ShortWrite { expected: usize, sent: usize },
    /// The transport failed part way through.
    Io {
        expected: usize,
        sent: usize,
        source: io::Error,
    },
    /// The sender was already closed.
    Closed,
}

impl SendError {
    /// Bytes the transport took before the failure.
    pub fn bytes_sent(&self) -> usize {
        match self {
            SendError::ShortWrite { sent, .. } | SendError::Io { sent, .. } => *sent,
            SendError::Closed => 0,
        }
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::ShortWrite { expected, sent } => {
                write!(f, "Tried to send {expected} bytes, sent {sent}")
            }
            SendError::Io { expected, sent, source } => {
                write!(f, "Tried to send {expected} bytes, sent {sent}: {source}")
            }
            SendError::Closed => write!(f, "sender is closed"),
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SendError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
