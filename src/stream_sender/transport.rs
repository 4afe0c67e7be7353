use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};

/// A blocking byte sink the sender can also close.
///
/// `TcpStream` is the real one; tests substitute in-memory transports that
/// short-write or count closes.
pub trait Transport: Write {
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn shutdown(&mut self) -> io::Result<()> {
        (**self).shutdown()
    }
}
