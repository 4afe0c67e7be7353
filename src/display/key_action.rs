use std::sync::Arc;

use crate::frame_source::{CaptureDevice, DeviceOption};
use crate::log::log_sink::LogSink;
use crate::{sink_info, sink_warn};

use super::DisplayConfig;

const KEY_ESC: i32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleRectification,
    ToggleColorToDepth,
    ToggleDepthToColor,
    ToggleEmitter,
    ToggleAutoExposure,
    Quit,
}

impl KeyAction {
    /// Map a key code (ASCII, either case) to an action.
    pub fn from_key(code: i32) -> Option<Self> {
        if code == KEY_ESC {
            return Some(KeyAction::Quit);
        }
        let ch = u8::try_from(code).ok()?.to_ascii_lowercase();
        match ch {
            b'r' => Some(KeyAction::ToggleRectification),
            b'c' => Some(KeyAction::ToggleColorToDepth),
            b'd' => Some(KeyAction::ToggleDepthToColor),
            b'e' => Some(KeyAction::ToggleEmitter),
            b'a' => Some(KeyAction::ToggleAutoExposure),
            _ => None,
        }
    }

    /// Apply a toggle. View flags flip in `config`; device options flip on
    /// `dev` only if it supports them. Returns false for `Quit`.
    pub fn apply<D: CaptureDevice + ?Sized>(
        self,
        config: &mut DisplayConfig,
        dev: &mut D,
        log: &Arc<dyn LogSink>,
    ) -> bool {
        match self {
            KeyAction::ToggleRectification => {
                config.color_rectification_enabled = !config.color_rectification_enabled;
            }
            KeyAction::ToggleColorToDepth => {
                config.align_color_to_depth = !config.align_color_to_depth;
            }
            KeyAction::ToggleDepthToColor => {
                config.align_depth_to_color = !config.align_depth_to_color;
            }
            KeyAction::ToggleEmitter => toggle_option(dev, DeviceOption::EmitterEnabled, log),
            KeyAction::ToggleAutoExposure => {
                toggle_option(dev, DeviceOption::AutoExposureEnabled, log);
            }
            KeyAction::Quit => return false,
        }
        true
    }
}

fn toggle_option<D: CaptureDevice + ?Sized>(
    dev: &mut D,
    option: DeviceOption,
    log: &Arc<dyn LogSink>,
) {
    if !dev.supports_option(option) {
        return;
    }
    let result = dev
        .get_option(option)
        .and_then(|current| dev.set_option(option, !current).map(|()| !current));
    match result {
        Ok(value) => sink_info!(log, "Setting {option} to {}", u8::from(value)),
        Err(e) => sink_warn!(log, "could not toggle {option}: {e}"),
    }
}
