use opencv::Error as CvError;
use std::fmt;

use super::{DeviceOption, StreamKind, StreamPreset};

#[derive(Debug)]
pub enum CameraError {
    /// Probing found no camera at all.
    NoDevice,
    OpenFailed(i32),
    /// A driver call failed; names the call and its arguments.
    CallFailed {
        call: &'static str,
        args: String,
        reason: String,
    },
    UnsupportedStream { stream: StreamKind, preset: StreamPreset },
    UnsupportedOption(DeviceOption),
    StreamNotEnabled(StreamKind),
    NotFrame,
    CameraOff,
    OpenCvError(CvError),
}

impl CameraError {
    pub fn call(call: &'static str, args: impl Into<String>, reason: impl fmt::Display) -> Self {
        CameraError::CallFailed {
            call,
            args: args.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CameraError::{
            CallFailed, CameraOff, NoDevice, NotFrame, OpenCvError, OpenFailed, StreamNotEnabled,
            UnsupportedOption, UnsupportedStream,
        };
        match self {
            NoDevice => write!(f, "No device detected. Is it plugged in?"),
            OpenFailed(id) => write!(f, "Failed to open camera with device_id: {id}"),
            CallFailed { call, args, reason } => {
                write!(f, "camera error calling {call}({args}):\n    {reason}")
            }
            UnsupportedStream { stream, preset } => {
                write!(f, "camera error calling enable_stream({stream}, {preset}):")?;
                write!(f, "\n    stream not supported")
            }
            UnsupportedOption(opt) => write!(f, "option not supported: {opt}"),
            StreamNotEnabled(stream) => write!(f, "stream not enabled: {stream}"),
            NotFrame => write!(f, "No valid frame available"),
            CameraOff => write!(f, "Camera not started"),
            OpenCvError(e) => write!(f, "OpenCV error: {e}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<CvError> for CameraError {
    fn from(err: CvError) -> Self {
        CameraError::OpenCvError(err)
    }
}
