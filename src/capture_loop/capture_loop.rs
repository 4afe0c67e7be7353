use std::sync::Arc;

use crate::config::CaptureSettings;
use crate::display::{DisplayConfig, KeyAction, PanelImage, Preview};
use crate::frame_proto::{RGB_BYTES_PER_PIXEL, RGB_FORMAT, encode_message};
use crate::frame_source::{CameraError, CaptureDevice, StreamKind};
use crate::log::log_sink::LogSink;
use crate::stream_sender::{Pacer, StreamSender, Transport};
use crate::utils::now_micros;
use crate::{sink_info, sink_warn};

use super::{LoopError, LoopOutcome, StopReason};

/// Per-run parameters of the capture loop.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub width: u32,
    pub height: u32,
    pub pacer: Pacer,
    /// Stop after this many frames were sent. `None` runs until the window closes.
    pub max_frames: Option<u64>,
}

impl LoopOptions {
    pub fn from_settings(settings: &CaptureSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            pacer: Pacer::new(settings.pacing),
            max_frames: None,
        }
    }

    pub fn color_frame_len(&self) -> usize {
        self.width as usize * self.height as usize * RGB_BYTES_PER_PIXEL
    }
}

/// Capture, send, pace, render; until the window closes or the peer goes away.
///
/// Runs on the calling thread. The blocking send is the only place the loop
/// waits on the network, and it waits without a timeout. Each color buffer
/// is borrowed from the device, copied into one freshly encoded message
/// stamped with the current time, and released before the next capture.
///
/// The sender is closed on every exit path.
///
/// # Errors
/// Driver and display failures, and a color buffer whose size does not match
/// `opts`. A failed send is not an error: it ends the loop with
/// [`StopReason::PeerGone`].
pub fn run_capture_loop<D, P, T>(
    dev: &mut D,
    preview: &mut P,
    sender: &mut StreamSender<T>,
    opts: &LoopOptions,
    log: &Arc<dyn LogSink>,
) -> Result<LoopOutcome, LoopError>
where
    D: CaptureDevice + ?Sized,
    P: Preview + ?Sized,
    T: Transport,
{
    let result = drive(dev, preview, sender, opts, log);
    sender.close();
    result
}

fn drive<D, P, T>(
    dev: &mut D,
    preview: &mut P,
    sender: &mut StreamSender<T>,
    opts: &LoopOptions,
    log: &Arc<dyn LogSink>,
) -> Result<LoopOutcome, LoopError>
where
    D: CaptureDevice + ?Sized,
    P: Preview + ?Sized,
    T: Transport,
{
    let expected = opts.color_frame_len();
    let width = i32::try_from(opts.width).unwrap_or(i32::MAX);
    let height = i32::try_from(opts.height).unwrap_or(i32::MAX);
    let mut display = DisplayConfig::default();
    let mut frames_sent: u64 = 0;

    let stop = loop {
        if preview.should_close() {
            break StopReason::WindowClosed;
        }
        if opts.max_frames.is_some_and(|max| frames_sent >= max) {
            break StopReason::MaxFrames;
        }

        if let Some(action) = preview.poll_key()?.and_then(KeyAction::from_key) {
            if !action.apply(&mut display, dev, log) {
                break StopReason::WindowClosed;
            }
        }

        dev.wait_for_frames()?;

        let color = dev.frame_data(StreamKind::Color).ok_or(CameraError::NotFrame)?;
        if color.len() != expected {
            return Err(LoopError::FrameSize {
                expected,
                actual: color.len(),
            });
        }
        let message = encode_message(now_micros(), width, height, RGB_FORMAT.as_bytes(), color)?;

        if let Err(e) = sender.send_frame(&message) {
            sink_warn!(log, "downstream peer gone after {frames_sent} frames");
            break StopReason::PeerGone(e);
        }
        frames_sent += 1;
        opts.pacer.pace();

        let shown: &D = dev;
        let panels = display.panel_streams().map(|stream| panel_for(shown, stream));
        preview.render(&panels)?;
    };

    sink_info!(log, "Done after {frames_sent} frames");
    Ok(LoopOutcome { frames_sent, stop })
}

fn panel_for<D: CaptureDevice + ?Sized>(dev: &D, stream: StreamKind) -> Option<PanelImage<'_>> {
    let data = dev.frame_data(stream)?;
    let intrinsics = dev.stream_intrinsics(stream)?;
    Some(PanelImage {
        stream,
        width: intrinsics.width as usize,
        height: intrinsics.height as usize,
        data,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::display::HeadlessPreview;
    use crate::frame_proto::{DecodeLimits, decode_message};
    use crate::frame_source::{SyntheticCamera, StreamPreset, prepare_device};
    use crate::log::NoopLogSink;
    use crate::stream_sender::{MemoryTransport, SendError};
    use std::time::Duration;

    const W: u32 = 8;
    const H: u32 = 4;

    fn camera() -> SyntheticCamera {
        let mut cam = SyntheticCamera::new();
        let log: Arc<dyn LogSink> = NoopLogSink::shared();
        prepare_device(
            &mut cam,
            StreamPreset::Explicit {
                width: W,
                height: H,
                fps: 30,
            },
            &log,
        )
        .unwrap();
        cam
    }

    fn opts() -> LoopOptions {
        LoopOptions {
            width: W,
            height: H,
            pacer: Pacer::new(Duration::ZERO),
            max_frames: None,
        }
    }

    fn log() -> Arc<dyn LogSink> {
        NoopLogSink::shared()
    }

    #[test]
    fn sends_one_message_per_frame_until_window_closes() {
        let mut cam = camera();
        let mut preview = HeadlessPreview::new().close_after(3);
        let transport = MemoryTransport::new();
        let mut sender = StreamSender::from_transport(transport.clone(), log());

        let before = now_micros();
        let out = run_capture_loop(&mut cam, &mut preview, &mut sender, &opts(), &log()).unwrap();

        assert!(matches!(out.stop, StopReason::WindowClosed));
        assert_eq!(out.frames_sent, 3);
        assert_eq!(preview.renders(), 3);
        assert!(!sender.is_open());
        assert_eq!(transport.shutdowns(), 1);

        let wire = transport.written();
        let limits = DecodeLimits::default();
        let mut at = 0;
        let mut last_ts = before;
        for _ in 0..3 {
            let (msg, used) = decode_message(&wire[at..], &limits).unwrap();
            assert_eq!((msg.width, msg.height), (8, 4));
            assert_eq!(msg.format, "RGB");
            assert_eq!(msg.pixels.len(), 8 * 4 * 3);
            assert!(msg.timestamp_us >= last_ts, "send-time stamps never go backwards");
            last_ts = msg.timestamp_us;
            at += used;
        }
        assert_eq!(at, wire.len());
    }

    #[test]
    fn short_write_ends_loop_as_peer_gone() {
        let mut cam = camera();
        let mut preview = HeadlessPreview::new();
        let frame_len = 32 + 3 + (W * H * 3) as usize;
        let transport = MemoryTransport::with_budget(frame_len + 10);
        let mut sender = StreamSender::from_transport(transport.clone(), log());

        let out = run_capture_loop(&mut cam, &mut preview, &mut sender, &opts(), &log()).unwrap();

        assert_eq!(out.frames_sent, 1);
        match out.stop {
            StopReason::PeerGone(SendError::ShortWrite { expected, sent }) => {
                assert_eq!(expected, frame_len);
                assert_eq!(sent, 10);
            }
            other => panic!("expected PeerGone(ShortWrite), got {other:?}"),
        }
        assert_eq!(cam.frames_produced(), 2, "no capture after the failed send");
        assert_eq!(preview.renders(), 1);
        assert_eq!(transport.shutdowns(), 1);
    }

    #[test]
    fn stops_at_frame_limit() {
        let mut cam = camera();
        let mut preview = HeadlessPreview::new();
        let mut sender = StreamSender::from_transport(MemoryTransport::new(), log());
        let opts = LoopOptions {
            max_frames: Some(5),
            ..opts()
        };

        let out = run_capture_loop(&mut cam, &mut preview, &mut sender, &opts, &log()).unwrap();
        assert!(matches!(out.stop, StopReason::MaxFrames));
        assert_eq!(out.frames_sent, 5);
        assert_eq!(sender.frames_sent(), 5);
    }

    #[test]
    fn wrong_sized_color_buffer_is_fatal() {
        let mut cam = camera();
        let mut preview = HeadlessPreview::new();
        let transport = MemoryTransport::new();
        let mut sender = StreamSender::from_transport(transport.clone(), log());
        let opts = LoopOptions {
            width: 640,
            height: 480,
            ..opts()
        };

        match run_capture_loop(&mut cam, &mut preview, &mut sender, &opts, &log()) {
            Err(LoopError::FrameSize { expected, actual }) => {
                assert_eq!(expected, 921_600);
                assert_eq!(actual, 96);
            }
            other => panic!("expected FrameSize, got {other:?}"),
        }
        assert!(transport.written().is_empty());
        assert_eq!(transport.shutdowns(), 1);
    }

    #[test]
    fn driver_failure_is_an_error() {
        let mut cam = camera().failing_at(2);
        let mut preview = HeadlessPreview::new();
        let mut sender = StreamSender::from_transport(MemoryTransport::new(), log());

        let err =
            run_capture_loop(&mut cam, &mut preview, &mut sender, &opts(), &log()).unwrap_err();
        assert!(matches!(err, LoopError::Camera(CameraError::NotFrame)));
        assert_eq!(sender.frames_sent(), 1);
    }

    #[test]
    fn keys_drive_view_and_escape_quits() {
        let mut cam = camera();
        let mut preview = HeadlessPreview::new().with_keys([i32::from(b'r'), -1, 27]);
        let mut sender = StreamSender::from_transport(MemoryTransport::new(), log());

        let out = run_capture_loop(&mut cam, &mut preview, &mut sender, &opts(), &log()).unwrap();

        assert!(matches!(out.stop, StopReason::WindowClosed));
        assert_eq!(out.frames_sent, 2);
        assert_eq!(
            preview.last_streams(),
            &[StreamKind::RectifiedColor, StreamKind::Infrared, StreamKind::Infrared2]
        );
    }
}
