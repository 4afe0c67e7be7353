//! Outbound TCP connection, send path and pacing.
pub mod connection_error;
pub mod memory_transport;
pub mod pacer;
pub mod send_error;
pub mod stream_sender;
pub mod transport;

pub use connection_error::ConnectionError;
pub use memory_transport::MemoryTransport;
pub use pacer::Pacer;
pub use send_error::SendError;
pub use stream_sender::StreamSender;
pub use transport::Transport;
