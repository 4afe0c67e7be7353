//! Top-level error for the binaries and its exit-status mapping.

use std::{fmt, io};

use crate::capture_loop::LoopError;
use crate::display::DisplayError;
use crate::frame_source::CameraError;
use crate::stream_sender::ConnectionError;

pub const USAGE_CAPTURE: &str = "Usage: tcp_capture <host> <port>";
pub const USAGE_VIEWER: &str = "Usage: frame_viewer <host> <port>";

#[derive(Debug)]
pub enum AppError {
    /// Bad command line; carries the usage line to print.
    Usage(&'static str),
    Connection(ConnectionError),
    Camera(CameraError),
    Display(DisplayError),
    Loop(LoopError),
    Io(io::Error),
}

impl AppError {
    /// Process exit status for this failure.
    ///
    /// Every variant is a setup or driver failure. A peer that goes away in
    /// the middle of a stream never becomes an `AppError`.
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Usage(usage) => write!(f, "{usage}"),
            AppError::Connection(e) => write!(f, "{e}"),
            AppError::Camera(e) => write!(f, "{e}"),
            AppError::Display(e) => write!(f, "{e}"),
            AppError::Loop(e) => write!(f, "{e}"),
            AppError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Usage(_) => None,
            AppError::Connection(e) => Some(e),
            AppError::Camera(e) => Some(e),
            AppError::Display(e) => Some(e),
            AppError::Loop(e) => Some(e),
            AppError::Io(e) => Some(e),
        }
    }
}

impl From<ConnectionError> for AppError {
    fn from(e: ConnectionError) -> Self {
        Self::Connection(e)
    }
}

impl From<CameraError> for AppError {
    fn from(e: CameraError) -> Self {
        Self::Camera(e)
    }
}

impl From<DisplayError> for AppError {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

impl From<LoopError> for AppError {
    fn from(e: LoopError) -> Self {
        Self::Loop(e)
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Parse `<prog> <host> <port>`.
///
/// # Errors
/// `AppError::Usage(usage)` unless there are exactly two arguments and the
/// port is a valid `u16`.
pub fn parse_host_port(args: &[String], usage: &'static str) -> Result<(String, u16), AppError> {
    match args {
        [_, host, port] => {
            let port = port.parse::<u16>().map_err(|_| AppError::Usage(usage))?;
            Ok((host.clone(), port))
        }
        _ => Err(AppError::Usage(usage)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn host_and_port_parse() {
        let argv = args(&["tcp_capture", "10.0.0.5", "9000"]);
        let (host, port) = parse_host_port(&argv, USAGE_CAPTURE).unwrap();
        assert_eq!(host, "10.0.0.5");
        assert_eq!(port, 9000);
    }

    #[test]
    fn wrong_arity_or_bad_port_is_usage() {
        for bad in [
            args(&["tcp_capture"]),
            args(&["tcp_capture", "host"]),
            args(&["tcp_capture", "host", "1", "extra"]),
            args(&["tcp_capture", "host", "70000"]),
            args(&["tcp_capture", "host", "port"]),
        ] {
            let err = parse_host_port(&bad, USAGE_CAPTURE).unwrap_err();
            assert!(matches!(err, AppError::Usage(_)));
            assert_eq!(err.to_string(), "Usage: tcp_capture <host> <port>");
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn driver_errors_name_the_call() {
        let lost = CameraError::call("wait_for_frames", "", "device lost");
        let err = AppError::from(LoopError::Camera(lost));
        assert!(err.to_string().starts_with("camera error calling wait_for_frames("));
        assert_eq!(err.exit_code(), 1);
    }
}
