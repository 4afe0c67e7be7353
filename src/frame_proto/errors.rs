use std::{fmt, io};

/// Protocol-level errors found while parsing a Frame Message.
#[derive(Debug)]
pub enum ProtoError {
    BadMagic(i64),
    Truncated { needed: usize, available: usize },
    NegativeLength { field: &'static str, value: i32 },
    TooLarge { field: &'static str, max: usize, actual: usize },
    InvalidFormatTag,
}

/// Frame-level error wrapper: IO vs protocol.
#[derive(Debug)]
pub enum FrameError {
    Io(io::Error),
    Proto(ProtoError),
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtoError::BadMagic(found) => write!(f, "bad magic 0x{found:016x}"),
            ProtoError::Truncated { needed, available } => {
                write!(f, "truncated message: need {needed} bytes, have {available}")
            }
            ProtoError::NegativeLength { field, value } => {
                write!(f, "negative {field}: {value}")
            }
            ProtoError::TooLarge { field, max, actual } => {
                write!(f, "{field} too large: {actual} > {max}")
            }
            ProtoError::InvalidFormatTag => write!(f, "format tag is not ASCII"),
        }
    }
}

impl std::error::Error for ProtoError {}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "I/O error: {e}"),
            FrameError::Proto(e) => write!(f, "protocol error: {e}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            FrameError::Proto(e) => Some(e),
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ProtoError> for FrameError {
    fn from(e: ProtoError) -> Self {
        Self::Proto(e)
    }
}

impl FrameError {
    /// True when the peer closed the stream cleanly between messages.
    pub fn is_eof(&self) -> bool {
        matches!(self, FrameError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}
