//! OpenCV-backed camera.
//!
//! Wraps a `VideoCapture` (V4L2, AVFoundation, MSMF ...) as a
//! [`CaptureDevice`]. A plain UVC camera only has a color sensor, so every
//! other stream is reported as unsupported.

use opencv::{
    core::{self, Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};

use std::sync::Arc;

use crate::log::log_sink::LogSink;
use crate::{sink_debug, sink_info};

use super::{
    CameraError, CaptureDevice, DeviceOption, StreamIntrinsics, StreamKind, StreamPreset,
    utils::copy_tight_rgb,
};

/// V4L2 encodes auto exposure as 0.75 (aperture priority) / 0.25 (manual).
const AUTO_EXPOSURE_ON: f64 = 0.75;
const AUTO_EXPOSURE_OFF: f64 = 0.25;

pub struct CameraManager {
    cam: Option<VideoCapture>,
    device_id: i32,
    name: String,
    log: Arc<dyn LogSink>,
    color: Option<StreamIntrinsics>,
    started: bool,
    bgr: Mat,
    rgb: Mat,
    resized: Mat,
    color_buf: Vec<u8>,
}

impl CameraManager {
    /// Indices in `0..max_index` that open as capture devices.
    ///
    /// # Errors
    /// `CameraError::NoDevice` when none does.
    pub fn enumerate(max_index: i32, log: &Arc<dyn LogSink>) -> Result<Vec<i32>, CameraError> {
        let mut found = Vec::new();
        for id in 0..max_index {
            let Ok(mut cam) = VideoCapture::new(id, videoio::CAP_ANY) else {
                continue;
            };
            if cam.is_opened().unwrap_or(false) {
                found.push(id);
            }
            let _ = cam.release();
        }
        sink_debug!(log, "camera scan found {found:?}");
        if found.is_empty() {
            return Err(CameraError::NoDevice);
        }
        Ok(found)
    }

    /// Open camera `device_id`.
    ///
    /// # Errors
    /// - `CameraError::CallFailed` if OpenCV cannot create the capture object.
    /// - `CameraError::OpenFailed` if the device does not open.
    pub fn open(device_id: i32, log: Arc<dyn LogSink>) -> Result<Self, CameraError> {
        let cam = VideoCapture::new(device_id, videoio::CAP_ANY)
            .map_err(|e| CameraError::call("VideoCapture::new", device_id.to_string(), e))?;
        if !cam.is_opened().unwrap_or(false) {
            return Err(CameraError::OpenFailed(device_id));
        }

        let backend = cam.get_backend_name().unwrap_or_else(|_| "unknown".to_owned());
        let name = format!("camera #{device_id} via {backend}");
        sink_info!(log, "Opened {name}");

        Ok(Self {
            cam: Some(cam),
            device_id,
            name,
            log,
            color: None,
            started: false,
            bgr: Mat::default(),
            rgb: Mat::default(),
            resized: Mat::default(),
            color_buf: Vec::new(),
        })
    }

    pub const fn device_id(&self) -> i32 {
        self.device_id
    }

    fn cam_mut(&mut self) -> Result<&mut VideoCapture, CameraError> {
        self.cam.as_mut().ok_or(CameraError::CameraOff)
    }

    fn set_prop(
        &mut self,
        prop: i32,
        prop_name: &'static str,
        value: f64,
    ) -> Result<(), CameraError> {
        let cam = self.cam_mut()?;
        let accepted = cam
            .set(prop, value)
            .map_err(|e| CameraError::call("set", format!("{prop_name}, {value}"), e))?;
        if !accepted {
            sink_debug!(self.log, "backend ignored {prop_name}={value}");
        }
        Ok(())
    }

    fn read_color(&mut self, want: StreamIntrinsics) -> Result<(), CameraError> {
        let cam = self.cam.as_mut().ok_or(CameraError::CameraOff)?;
        if !cam.read(&mut self.bgr).unwrap_or(false) || self.bgr.empty() {
            return Err(CameraError::NotFrame);
        }

        imgproc::cvt_color(
            &self.bgr,
            &mut self.rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| CameraError::call("cvtColor", "COLOR_BGR2RGB", e))?;

        // Backends may ignore the requested size; the stream contract is the enabled size.
        let (w, h) = (want.width as i32, want.height as i32);
        if self.rgb.cols() != w || self.rgb.rows() != h {
            imgproc::resize(
                &self.rgb,
                &mut self.resized,
                Size::new(w, h),
                0.0,
                0.0,
                imgproc::INTER_LINEAR,
            )
            .map_err(|e| CameraError::call("resize", format!("{w}x{h}"), e))?;
            copy_tight_rgb(&self.resized, &mut self.color_buf)?;
        } else {
            copy_tight_rgb(&self.rgb, &mut self.color_buf)?;
        }
        Ok(())
    }
}

impl CaptureDevice for CameraManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn enable_stream(
        &mut self,
        stream: StreamKind,
        preset: StreamPreset,
    ) -> Result<(), CameraError> {
        if stream != StreamKind::Color {
            return Err(CameraError::UnsupportedStream { stream, preset });
        }

        if let Some((w, h, fps)) = preset.resolve() {
            self.set_prop(videoio::CAP_PROP_FRAME_WIDTH, "CAP_PROP_FRAME_WIDTH", f64::from(w))?;
            self.set_prop(videoio::CAP_PROP_FRAME_HEIGHT, "CAP_PROP_FRAME_HEIGHT", f64::from(h))?;
            self.set_prop(videoio::CAP_PROP_FPS, "CAP_PROP_FPS", f64::from(fps))?;
            self.color = Some(StreamIntrinsics {
                width: w,
                height: h,
                fov: None,
            });
        } else {
            let cam = self.cam_mut()?;
            let w = cam.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or(640.0).clamp(1.0, 8192.0);
            let h = cam.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or(480.0).clamp(1.0, 8192.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (width, height) = (w.round() as u32, h.round() as u32);
            self.color = Some(StreamIntrinsics { width, height, fov: None });
        }
        Ok(())
    }

    fn is_stream_enabled(&self, stream: StreamKind) -> bool {
        stream == StreamKind::Color && self.color.is_some()
    }

    fn stream_intrinsics(&self, stream: StreamKind) -> Option<StreamIntrinsics> {
        if stream.native() == StreamKind::Color { self.color } else { None }
    }

    fn start(&mut self) -> Result<(), CameraError> {
        if self.cam.is_none() {
            return Err(CameraError::CameraOff);
        }
        if self.color.is_none() {
            return Err(CameraError::StreamNotEnabled(StreamKind::Color));
        }
        self.started = true;
        Ok(())
    }

    fn wait_for_frames(&mut self) -> Result<(), CameraError> {
        if !self.started {
            return Err(CameraError::CameraOff);
        }
        let want = self.color.ok_or(CameraError::StreamNotEnabled(StreamKind::Color))?;
        self.read_color(want)
    }

    fn frame_data(&self, stream: StreamKind) -> Option<&[u8]> {
        // No rectification or registration without calibration data; the
        // derived color views fall back to the raw color image.
        if stream.native() == StreamKind::Color && !self.color_buf.is_empty() {
            Some(&self.color_buf)
        } else {
            None
        }
    }

    fn supports_option(&self, option: DeviceOption) -> bool {
        matches!(option, DeviceOption::AutoExposureEnabled)
    }

    fn get_option(&self, option: DeviceOption) -> Result<bool, CameraError> {
        if !self.supports_option(option) {
            return Err(CameraError::UnsupportedOption(option));
        }
        let cam = self.cam.as_ref().ok_or(CameraError::CameraOff)?;
        let v = cam
            .get(videoio::CAP_PROP_AUTO_EXPOSURE)
            .map_err(|e| CameraError::call("get", "CAP_PROP_AUTO_EXPOSURE", e))?;
        Ok(v >= 0.5)
    }

    fn set_option(&mut self, option: DeviceOption, value: bool) -> Result<(), CameraError> {
        if !self.supports_option(option) {
            return Err(CameraError::UnsupportedOption(option));
        }
        let raw = if value { AUTO_EXPOSURE_ON } else { AUTO_EXPOSURE_OFF };
        self.set_prop(videoio::CAP_PROP_AUTO_EXPOSURE, "CAP_PROP_AUTO_EXPOSURE", raw)
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        if let Some(mut cam) = self.cam.take() {
            let _ = cam.release();
        }
    }
}
