//! `tcp_capture <host> <port>`: capture color frames, preview them locally and
//! stream them to `host:port` until the window closes or the peer goes away.

use std::sync::Arc;
use std::{env, process};

use tcpcapture::app_error::{AppError, USAGE_CAPTURE, parse_host_port};
use tcpcapture::capture_loop::{LoopOptions, LoopOutcome, StopReason, run_capture_loop};
use tcpcapture::config::{CaptureSettings, Config, LogSettings, SourceKind};
use tcpcapture::display::{HeadlessPreview, PreviewWindow};
use tcpcapture::frame_proto::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use tcpcapture::frame_source::{
    CameraManager, CaptureDevice, StreamPreset, SyntheticCamera, prepare_device,
};
use tcpcapture::log::StderrEcho;
use tcpcapture::log::log_level::LogLevel;
use tcpcapture::log::log_sink::LogSink;
use tcpcapture::log::logger::Logger;
use tcpcapture::stream_sender::{StreamSender, Transport};
use tcpcapture::{sink_info, sink_log};

const CONFIG_FILE: &str = "tcp_capture.conf";
/// Device indices tried when looking for a camera.
const MAX_DEVICE_INDEX: i32 = 8;
const CAPTURE_FPS: u32 = 30;

fn main() {
    let args: Vec<String> = env::args().collect();
    let (host, port) = match parse_host_port(&args, USAGE_CAPTURE) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    };

    let config = Config::load_or_empty(CONFIG_FILE);
    let settings = CaptureSettings::from_config(&config);

    // --- Start process logger ----------------------------------------------
    let logger = Logger::start("tcp_capture", &LogSettings::from_config(&config), 1024, 128, 10);
    let log: Arc<dyn LogSink> = Arc::new(StderrEcho::new("tcp_capture", Arc::new(logger.handle())));

    let code = match run(&host, port, &settings, &log) {
        Ok(outcome) => {
            let why = match &outcome.stop {
                StopReason::WindowClosed => "window closed".to_owned(),
                StopReason::PeerGone(e) => format!("peer gone ({e})"),
                StopReason::MaxFrames => "frame limit reached".to_owned(),
            };
            sink_info!(log, "stopped after {} frames: {why}", outcome.frames_sent);
            0
        }
        Err(e) => {
            // Not feature-gated: fatal errors always reach stderr.
            sink_log!(log, LogLevel::Error, "{e}");
            e.exit_code()
        }
    };

    drop(log);
    logger.finish();
    process::exit(code);
}

fn run(
    host: &str,
    port: u16,
    settings: &CaptureSettings,
    log: &Arc<dyn LogSink>,
) -> Result<LoopOutcome, AppError> {
    // Connect before touching the camera so a bad address fails fast.
    let mut sender = StreamSender::connect(host, port, Arc::clone(log))?;

    let preset = if (settings.width, settings.height) == (DEFAULT_WIDTH, DEFAULT_HEIGHT) {
        StreamPreset::BestQuality
    } else {
        StreamPreset::Explicit {
            width: settings.width,
            height: settings.height,
            fps: CAPTURE_FPS,
        }
    };

    match settings.source {
        SourceKind::Camera => {
            let found = CameraManager::enumerate(MAX_DEVICE_INDEX, log)?;
            let id = if found.contains(&settings.device_id) {
                settings.device_id
            } else {
                found.first().copied().unwrap_or(settings.device_id)
            };
            let mut cam = CameraManager::open(id, Arc::clone(log))?;
            capture(&mut cam, preset, &mut sender, settings, log)
        }
        SourceKind::Synthetic => {
            let mut cam = SyntheticCamera::new();
            capture(&mut cam, preset, &mut sender, settings, log)
        }
    }
}

fn capture<D: CaptureDevice, T: Transport>(
    dev: &mut D,
    preset: StreamPreset,
    sender: &mut StreamSender<T>,
    settings: &CaptureSettings,
    log: &Arc<dyn LogSink>,
) -> Result<LoopOutcome, AppError> {
    prepare_device(dev, preset, log)?;
    let opts = LoopOptions::from_settings(settings);

    let outcome = if settings.preview_enabled {
        let mut window = PreviewWindow::open(dev.name())?;
        run_capture_loop(dev, &mut window, sender, &opts, log)?
    } else {
        let mut headless = HeadlessPreview::new();
        run_capture_loop(dev, &mut headless, sender, &opts, log)?
    };
    Ok(outcome)
}
