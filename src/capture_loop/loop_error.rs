use std::fmt;

use crate::display::DisplayError;
use crate::frame_proto::ProtoError;
use crate::frame_source::CameraError;

/// Failures that end the capture loop with a failure status.
///
/// A broken peer is not one of them; see
/// [`StopReason::PeerGone`](super::StopReason::PeerGone).
#[derive(Debug)]
pub enum LoopError {
    Camera(CameraError),
    Display(DisplayError),
    /// The driver handed back a color buffer of the wrong size.
    FrameSize { expected: usize, actual: usize },
    /// The frame does not fit the wire format's length fields.
    Encode(ProtoError),
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::Camera(e) => write!(f, "{e}"),
            LoopError::Display(e) => write!(f, "{e}"),
            LoopError::FrameSize { expected, actual } => {
                write!(f, "color frame is {actual} bytes, expected {expected}")
            }
            LoopError::Encode(e) => write!(f, "cannot encode frame: {e}"),
        }
    }
}

impl std::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoopError::Camera(e) => Some(e),
            LoopError::Display(e) => Some(e),
            LoopError::FrameSize { .. } => None,
            LoopError::Encode(e) => Some(e),
        }
    }
}

impl From<CameraError> for LoopError {
    fn from(e: CameraError) -> Self {
        Self::Camera(e)
    }
}

impl From<DisplayError> for LoopError {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

impl From<ProtoError> for LoopError {
    fn from(e: ProtoError) -> Self {
        Self::Encode(e)
    }
}
