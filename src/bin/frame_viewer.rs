//! `frame_viewer <host> <port>`: listen on `host:port`, decode the frame
//! stream from `tcp_capture` and show it in a window.

use std::sync::{Arc, mpsc};
use std::{env, process, thread};

use tcpcapture::app_error::{USAGE_VIEWER, parse_host_port};
use tcpcapture::config::{Config, LogSettings, ViewerSettings};
use tcpcapture::frame_proto::DecodeLimits;
use tcpcapture::log::StderrEcho;
use tcpcapture::log::log_level::LogLevel;
use tcpcapture::log::log_sink::LogSink;
use tcpcapture::log::logger::Logger;
use tcpcapture::sink_log;
use tcpcapture::viewer::{FrameReceiver, ViewerApp};

const CONFIG_FILE: &str = "frame_viewer.conf";

fn main() -> eframe::Result<()> {
    let args: Vec<String> = env::args().collect();
    let (host, port) = match parse_host_port(&args, USAGE_VIEWER) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    };

    let config = Config::load_or_empty(CONFIG_FILE);
    let settings = ViewerSettings::from_config(&config);
    let logger = Logger::start("frame_viewer", &LogSettings::from_config(&config), 1024, 256, 1);
    let log: Arc<dyn LogSink> =
        Arc::new(StderrEcho::new("frame_viewer", Arc::new(logger.handle())));

    let limits = DecodeLimits {
        max_pixel_len: settings.max_pixel_len,
        ..DecodeLimits::default()
    };
    let receiver = match FrameReceiver::bind((host.as_str(), port), limits, Arc::clone(&log)) {
        Ok(r) => r,
        Err(e) => {
            sink_log!(log, LogLevel::Error, "cannot listen on {host}:{port}: {e}");
            drop(log);
            logger.finish();
            process::exit(1);
        }
    };

    let (tx, rx) = mpsc::channel();
    let net_log = Arc::clone(&log);
    let spawned = thread::Builder::new().name("frame-receiver".into()).spawn(move || {
        if let Err(e) = receiver.serve(&tx) {
            sink_log!(net_log, LogLevel::Error, "receiver stopped: {e}");
        }
    });
    if let Err(e) = spawned {
        sink_log!(log, LogLevel::Error, "cannot start receiver thread: {e}");
        drop(log);
        logger.finish();
        process::exit(1);
    }
    drop(log);

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        &format!("Frame viewer • {host}:{port}"),
        native_options,
        Box::new(move |cc| {
            let app = ViewerApp::new(cc, rx, logger, settings.repaint);
            Ok(Box::new(app))
        }),
    )
}
