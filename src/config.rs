use std::collections::HashMap;
use std::fs;
use std::str::FromStr;
use std::time::Duration;

use crate::frame_proto::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_WIRE_LEN, RGB_BYTES_PER_PIXEL};
use crate::log::log_level::LogLevel;

/// 30 frames per second, open loop.
pub const DEFAULT_PACING_US: u64 = 33_333;

/// Flat `key = value` file with optional `[Section]` headers.
///
/// Lines starting with `#` are comments; values may be wrapped in quotes.
/// Keys before the first header are globals and act as fallbacks for
/// [`Config::get_or_default`].
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Error reading file {path}: {e}"))?;
        Ok(Self::parse(&content))
    }

    /// Like [`Config::load`] but a missing or unreadable file gives an empty config.
    pub fn load_or_empty(path: &str) -> Self {
        Self::load(path).unwrap_or_default()
    }

    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::empty();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();
                match &current_section {
                    None => {
                        cfg.globals.insert(key, value);
                    }
                    Some(sec) => {
                        cfg.sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        cfg
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }

    /// Parse a section value, falling back to `default` when absent or malformed.
    #[must_use]
    pub fn get_parsed<T: FromStr>(&self, section: &str, key: &str, default: T) -> T {
        self.get_non_empty(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

/// Where frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Camera,
    Synthetic,
}

/// `[Capture]` and `[Display]` settings for the `tcp_capture` client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    pub device_id: i32,
    pub pacing: Duration,
    pub source: SourceKind,
    pub preview_enabled: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            device_id: 0,
            pacing: Duration::from_micros(DEFAULT_PACING_US),
            source: SourceKind::Camera,
            preview_enabled: true,
        }
    }
}

/// Whether an RGB frame of this size fits the wire format's `i32` length field.
fn rgb_frame_fits(width: u32, height: u32) -> bool {
    u64::from(width) * u64::from(height) * RGB_BYTES_PER_PIXEL as u64 <= MAX_WIRE_LEN as u64
}

impl CaptureSettings {
    /// Frames are always sent as `RGB`, so there is no format key. A size
    /// too large for one message falls back to the default size.
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        let width = cfg.get_parsed("Capture", "width", d.width).max(1);
        let height = cfg.get_parsed("Capture", "height", d.height).max(1);
        let (width, height) = if rgb_frame_fits(width, height) {
            (width, height)
        } else {
            (d.width, d.height)
        };
        let source = match cfg.get_non_empty("Capture", "source") {
            Some(s) if s.eq_ignore_ascii_case("synthetic") => SourceKind::Synthetic,
            _ => SourceKind::Camera,
        };
        Self {
            width,
            height,
            device_id: cfg.get_parsed("Capture", "device_id", d.device_id),
            pacing: Duration::from_micros(cfg.get_parsed(
                "Capture",
                "pacing_us",
                DEFAULT_PACING_US,
            )),
            source,
            preview_enabled: cfg.get_parsed("Display", "enabled", d.preview_enabled),
        }
    }
}

/// `[Viewer]` settings for the `frame_viewer` receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSettings {
    pub max_pixel_len: usize,
    pub repaint: Duration,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            max_pixel_len: crate::frame_proto::MAX_PIXEL_LEN,
            repaint: Duration::from_millis(16),
        }
    }
}

impl ViewerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            max_pixel_len: cfg.get_parsed("Viewer", "max_pixel_len", d.max_pixel_len),
            repaint: Duration::from_millis(cfg.get_parsed("Viewer", "repaint_ms", 16)),
        }
    }
}

/// `[Logging]` settings shared by both binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: Option<String>,
    pub file_name: Option<String>,
    pub min_level: LogLevel,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: None,
            min_level: LogLevel::Trace,
        }
    }
}

impl LogSettings {
    pub fn from_config(cfg: &Config) -> Self {
        let level = cfg.get_non_empty("Logging", "level").map(str::to_ascii_lowercase);
        let min_level = match level.as_deref() {
            Some("debug") => LogLevel::Debug,
            Some("info") => LogLevel::Info,
            Some("warn") => LogLevel::Warn,
            Some("error") => LogLevel::Error,
            _ => LogLevel::Trace,
        };
        Self {
            dir: cfg.get_non_empty("Logging", "log_path").map(str::to_owned),
            file_name: cfg.get_non_empty("Logging", "log_filename").map(str::to_owned),
            min_level,
        }
    }
}
