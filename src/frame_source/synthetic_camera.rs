use std::collections::HashMap;

use super::{CameraError, CaptureDevice, DeviceOption, StreamIntrinsics, StreamKind, StreamPreset};

/// Deterministic stand-in camera: a moving RGB gradient plus a gray
/// infrared ramp. No depth sensor, so `Depth` is unsupported just like a
/// UVC webcam.
pub struct SyntheticCamera {
    enabled: HashMap<StreamKind, StreamIntrinsics>,
    started: bool,
    tick: u64,
    fail_at: Option<u64>,
    emitter: bool,
    auto_exposure: bool,
    color: Vec<u8>,
    infrared: Vec<u8>,
    infrared2: Vec<u8>,
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticCamera {
    pub fn new() -> Self {
        Self {
            enabled: HashMap::new(),
            started: false,
            tick: 0,
            fail_at: None,
            emitter: true,
            auto_exposure: true,
            color: Vec::new(),
            infrared: Vec::new(),
            infrared2: Vec::new(),
        }
    }

    /// Make the `n`th `wait_for_frames` call (1-based) fail with `NotFrame`.
    pub fn failing_at(mut self, n: u64) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub const fn frames_produced(&self) -> u64 {
        self.tick
    }

    fn render(&mut self) {
        let t = self.tick as u8;
        if let Some(i) = self.enabled.get(&StreamKind::Color).copied() {
            let (w, h) = (i.width as usize, i.height as usize);
            self.color.clear();
            self.color.reserve(w * h * 3);
            for y in 0..h {
                for x in 0..w {
                    self.color.push((x as u8) ^ t);
                    self.color.push((y as u8) ^ t);
                    self.color.push((x.wrapping_add(y) as u8) ^ t);
                }
            }
        }
        let ramp = |i: Option<StreamIntrinsics>, offset: u8, out: &mut Vec<u8>| {
            out.clear();
            if let Some(i) = i {
                let w = i.width as usize;
                let len = w * i.height as usize;
                out.extend((0..len).map(|p| ((p % w) as u8).wrapping_add(t ^ offset)));
            }
        };
        ramp(self.enabled.get(&StreamKind::Infrared).copied(), 0, &mut self.infrared);
        ramp(self.enabled.get(&StreamKind::Infrared2).copied(), 0x80, &mut self.infrared2);
    }
}

impl CaptureDevice for SyntheticCamera {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn enable_stream(
        &mut self,
        stream: StreamKind,
        preset: StreamPreset,
    ) -> Result<(), CameraError> {
        if !matches!(stream, StreamKind::Color | StreamKind::Infrared | StreamKind::Infrared2) {
            return Err(CameraError::UnsupportedStream { stream, preset });
        }
        // `Any` follows the color sensor when it is already configured.
        let (width, height) = match preset.resolve() {
            Some((w, h, _)) => (w, h),
            None => self
                .enabled
                .get(&StreamKind::Color)
                .map_or((640, 480), |c| (c.width, c.height)),
        };
        self.enabled.insert(
            stream,
            StreamIntrinsics {
                width,
                height,
                fov: Some((59.0, 46.0)),
            },
        );
        Ok(())
    }

    fn is_stream_enabled(&self, stream: StreamKind) -> bool {
        self.enabled.contains_key(&stream)
    }

    fn stream_intrinsics(&self, stream: StreamKind) -> Option<StreamIntrinsics> {
        self.enabled.get(&stream.native()).copied()
    }

    fn start(&mut self) -> Result<(), CameraError> {
        if self.enabled.is_empty() {
            return Err(CameraError::StreamNotEnabled(StreamKind::Color));
        }
        self.started = true;
        Ok(())
    }

    fn wait_for_frames(&mut self) -> Result<(), CameraError> {
        if !self.started {
            return Err(CameraError::CameraOff);
        }
        self.tick += 1;
        if self.fail_at == Some(self.tick) {
            return Err(CameraError::NotFrame);
        }
        self.render();
        Ok(())
    }

    fn frame_data(&self, stream: StreamKind) -> Option<&[u8]> {
        let buf = match stream.native() {
            StreamKind::Color => &self.color,
            StreamKind::Infrared => &self.infrared,
            StreamKind::Infrared2 => &self.infrared2,
            _ => return None,
        };
        (!buf.is_empty()).then_some(buf.as_slice())
    }

    fn supports_option(&self, _option: DeviceOption) -> bool {
        true
    }

    fn get_option(&self, option: DeviceOption) -> Result<bool, CameraError> {
        Ok(match option {
            DeviceOption::EmitterEnabled => self.emitter,
            DeviceOption::AutoExposureEnabled => self.auto_exposure,
        })
    }

    fn set_option(&mut self, option: DeviceOption, value: bool) -> Result<(), CameraError> {
        match option {
            DeviceOption::EmitterEnabled => self.emitter = value,
            DeviceOption::AutoExposureEnabled => self.auto_exposure = value,
        }
        Ok(())
    }
}
