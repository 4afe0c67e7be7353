use std::sync::Arc;

use crate::log::log_sink::LogSink;
use crate::{sink_info, sink_warn};

use super::{CameraError, CaptureDevice, StreamKind, StreamPreset};

/// Enable streams, report what will be captured, and start the device.
///
/// Color is required. Depth and infrared feed the preview only, so a device
/// that lacks those sensors is logged and accepted; any other failure while
/// enabling them is returned. The second infrared sensor is
/// requested in whatever mode the device offers and its absence is ignored.
///
/// # Errors
/// Any error from enabling the color stream or from `start`, and any
/// depth/infrared error other than `CameraError::UnsupportedStream`.
pub fn prepare_device<D: CaptureDevice + ?Sized>(
    dev: &mut D,
    preset: StreamPreset,
    log: &Arc<dyn LogSink>,
) -> Result<(), CameraError> {
    dev.enable_stream(StreamKind::Color, preset)?;
    for stream in [StreamKind::Depth, StreamKind::Infrared] {
        match dev.enable_stream(stream, preset) {
            Ok(()) => {}
            // The sensor is absent; a plain webcam has no depth or infrared.
            Err(e @ CameraError::UnsupportedStream { .. }) => {
                sink_warn!(log, "{stream} stream unavailable on {}: {e}", dev.name());
            }
            Err(e) => return Err(e),
        }
    }
    let _ = dev.enable_stream(StreamKind::Infrared2, StreamPreset::Any);

    for stream in StreamKind::NATIVE {
        if !dev.is_stream_enabled(stream) {
            continue;
        }
        if let Some(i) = dev.stream_intrinsics(stream) {
            let fov = i
                .fov
                .map_or_else(|| "unknown".to_owned(), |(h, v)| format!("{h:.1} x {v:.1}"));
            sink_info!(log, "Capturing {stream} at {} x {}, fov = {fov}", i.width, i.height);
        }
    }

    dev.start()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::frame_source::{DeviceOption, StreamIntrinsics, SyntheticCamera};
    use crate::log::{MemoryLogSink, log_level::LogLevel};

    #[test]
    fn tolerates_missing_depth_and_starts() {
        let mem = Arc::new(MemoryLogSink::new());
        let log: Arc<dyn LogSink> = mem.clone();
        let mut cam = SyntheticCamera::new();

        prepare_device(&mut cam, StreamPreset::BestQuality, &log).unwrap();

        assert!(cam.is_stream_enabled(StreamKind::Color));
        assert!(cam.is_stream_enabled(StreamKind::Infrared));
        assert!(cam.is_stream_enabled(StreamKind::Infrared2));
        assert!(!cam.is_stream_enabled(StreamKind::Depth));
        assert!(mem.contains(LogLevel::Warn, "depth stream unavailable"));
        assert!(mem.contains(LogLevel::Info, "Capturing color at 640 x 480, fov = 59.0 x 46.0"));
        cam.wait_for_frames().unwrap();
    }

    /// Synthetic camera whose depth sensor exists but fails to configure.
    struct FlakyDepth(SyntheticCamera);

    impl CaptureDevice for FlakyDepth {
        fn name(&self) -> &str {
            "flaky-depth"
        }
        fn enable_stream(
            &mut self,
            stream: StreamKind,
            preset: StreamPreset,
        ) -> Result<(), CameraError> {
            if stream == StreamKind::Depth {
                let args = format!("{stream}, {preset}");
                return Err(CameraError::call("enable_stream", args, "USB bandwidth exceeded"));
            }
            self.0.enable_stream(stream, preset)
        }
        fn is_stream_enabled(&self, stream: StreamKind) -> bool {
            self.0.is_stream_enabled(stream)
        }
        fn stream_intrinsics(&self, stream: StreamKind) -> Option<StreamIntrinsics> {
            self.0.stream_intrinsics(stream)
        }
        fn start(&mut self) -> Result<(), CameraError> {
            self.0.start()
        }
        fn wait_for_frames(&mut self) -> Result<(), CameraError> {
            self.0.wait_for_frames()
        }
        fn frame_data(&self, stream: StreamKind) -> Option<&[u8]> {
            self.0.frame_data(stream)
        }
        fn supports_option(&self, option: DeviceOption) -> bool {
            self.0.supports_option(option)
        }
        fn get_option(&self, option: DeviceOption) -> Result<bool, CameraError> {
            self.0.get_option(option)
        }
        fn set_option(&mut self, option: DeviceOption, value: bool) -> Result<(), CameraError> {
            self.0.set_option(option, value)
        }
    }

    #[test]
    fn depth_driver_failure_aborts_setup() {
        let log: Arc<dyn LogSink> = Arc::new(MemoryLogSink::new());
        let mut cam = FlakyDepth(SyntheticCamera::new());

        match prepare_device(&mut cam, StreamPreset::BestQuality, &log) {
            Err(CameraError::CallFailed { call, reason, .. }) => {
                assert_eq!(call, "enable_stream");
                assert_eq!(reason, "USB bandwidth exceeded");
            }
            other => panic!("expected CallFailed, got {other:?}"),
        }
        assert!(
            matches!(cam.wait_for_frames(), Err(CameraError::CameraOff)),
            "device was not started"
        );
    }
}
