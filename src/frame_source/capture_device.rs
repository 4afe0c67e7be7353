use super::{CameraError, DeviceOption, StreamIntrinsics, StreamKind, StreamPreset};

/// A depth/color camera as the capture loop sees it.
///
/// Buffers returned by [`frame_data`](CaptureDevice::frame_data) borrow the
/// device and are only valid until the next
/// [`wait_for_frames`](CaptureDevice::wait_for_frames).
pub trait CaptureDevice {
    fn name(&self) -> &str;

    fn enable_stream(
        &mut self,
        stream: StreamKind,
        preset: StreamPreset,
    ) -> Result<(), CameraError>;

    fn is_stream_enabled(&self, stream: StreamKind) -> bool;

    fn stream_intrinsics(&self, stream: StreamKind) -> Option<StreamIntrinsics>;

    fn start(&mut self) -> Result<(), CameraError>;

    /// Block until a new frame set is ready.
    fn wait_for_frames(&mut self) -> Result<(), CameraError>;

    /// Most recent buffer for `stream`, tightly packed, row-major.
    fn frame_data(&self, stream: StreamKind) -> Option<&[u8]>;

    fn supports_option(&self, option: DeviceOption) -> bool;

    fn get_option(&self, option: DeviceOption) -> Result<bool, CameraError>;

    fn set_option(&mut self, option: DeviceOption, value: bool) -> Result<(), CameraError>;
}
