use std::{fmt, io};

/// Setup failures before any frame is sent.
#[derive(Debug)]
pub enum ConnectionError {
    /// Host name did not resolve, or resolved to nothing.
    Resolve { host: String, source: Option<io::Error> },
    /// Every resolved address refused or failed the handshake; holds the last error.
    Connect { host: String, port: u16, source: io::Error },
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::Resolve { host, source: Some(e) } => {
                write!(f, "Error getting host by name '{host}': {e}")
            }
            ConnectionError::Resolve { host, source: None } => {
                write!(f, "Error getting host by name '{host}': no addresses")
            }
            ConnectionError::Connect { host, port, source } => {
                write!(f, "Error connecting to {host}:{port}: {source}")
            }
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Resolve { source, .. } => source
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            ConnectionError::Connect { source, .. } => Some(source),
        }
    }
}
