use std::io::{self, ErrorKind};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;

use crate::log::log_sink::LogSink;
use crate::{sink_debug, sink_error, sink_info};

use super::{ConnectionError, SendError, Transport};

/// Owns the single outbound connection and pushes encoded frames down it.
///
/// Sends are fully blocking and have no timeout: a stalled peer stalls the
/// caller. Any send failure closes the sender; there is no retry and no
/// reconnect.
pub struct StreamSender<T: Transport> {
    transport: Option<T>,
    log: Arc<dyn LogSink>,
    frames_sent: u64,
    bytes_sent: u64,
}

impl StreamSender<TcpStream> {
    /// Resolve `host` and open a blocking TCP connection to it.
    ///
    /// Resolved addresses are tried in order; the error from the last one is
    /// returned if none accepts.
    ///
    /// # Errors
    /// - `ConnectionError::Resolve` if the name does not resolve.
    /// - `ConnectionError::Connect` if no address accepts the connection.
    pub fn connect(host: &str, port: u16, log: Arc<dyn LogSink>) -> Result<Self, ConnectionError> {
        sink_info!(log, "Connecting to '{host}' on port {port}");

        let addrs: Vec<_> = (host, port)
            .to_socket_addrs()
            .map_err(|e| ConnectionError::Resolve {
                host: host.to_owned(),
                source: Some(e),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ConnectionError::Resolve {
                host: host.to_owned(),
                source: None,
            });
        }

        let mut last_err = None;
        for addr in &addrs {
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    sink_info!(log, "Connected to {addr}");
                    return Ok(Self::from_transport(stream, log));
                }
                Err(e) => {
                    sink_debug!(log, "connect to {addr} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        Err(ConnectionError::Connect {
            host: host.to_owned(),
            port,
            source: last_err.unwrap_or_else(|| io::Error::from(ErrorKind::AddrNotAvailable)),
        })
    }
}

impl<T: Transport> StreamSender<T> {
    /// Wrap an already-open transport.
    pub fn from_transport(transport: T, log: Arc<dyn LogSink>) -> Self {
        Self {
            transport: Some(transport),
            log,
            frames_sent: 0,
            bytes_sent: 0,
        }
    }

    /// Write one whole encoded message, looping over partial writes.
    ///
    /// Returns the number of bytes written, always `message.len()` on success.
    ///
    /// # Errors
    /// - `SendError::ShortWrite` if the transport stops accepting bytes
    ///   (`write` returns 0) before the buffer is done.
    /// - `SendError::Io` on any other transport error.
    /// - `SendError::Closed` if the sender was closed; nothing is written.
    ///
    /// On `ShortWrite` and `Io` the discrepancy is logged and the sender closes.
    pub fn send_frame(&mut self, message: &[u8]) -> Result<usize, SendError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(SendError::Closed);
        };

        let expected = message.len();
        let mut sent = 0;
        let outcome = loop {
            if sent == expected {
                break transport.flush().map_err(|source| SendError::Io {
                    expected,
                    sent,
                    source,
                });
            }
            match transport.write(&message[sent..]) {
                Ok(0) => break Err(SendError::ShortWrite { expected, sent }),
                Ok(n) => sent += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => {
                    break Err(SendError::Io {
                        expected,
                        sent,
                        source,
                    });
                }
            }
        };

        match outcome {
            Ok(()) => {
                self.frames_sent += 1;
                self.bytes_sent += expected as u64;
                #[cfg(feature = "wire-debug")]
                sink_debug!(self.log, "frame #{} sent ({expected} bytes)", self.frames_sent);
                Ok(expected)
            }
            Err(e) => {
                sink_error!(self.log, "{e}");
                self.close();
                Err(e)
            }
        }
    }

    /// Shut down and release the transport. Does nothing if already closed.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.shutdown() {
                sink_debug!(self.log, "shutdown: {e}");
            }
            sink_info!(
                self.log,
                "Connection closed after {} frames ({} bytes)",
                self.frames_sent,
                self.bytes_sent
            );
        }
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl<T: Transport> Drop for StreamSender<T> {
    fn drop(&mut self) {
        self.close();
    }
}
