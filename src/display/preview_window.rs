//! Preview window on OpenCV's highgui.

use opencv::{
    core::{CV_8UC3, Mat, Scalar},
    highgui,
    prelude::*,
};

use super::{DisplayError, PanelImage, Preview, compose_mosaic};

pub const WINDOW_WIDTH: i32 = 1280;
pub const WINDOW_HEIGHT: i32 = 960;

/// Key polling granularity; highgui only pumps events inside `wait_key`.
const POLL_MS: i32 = 1;

pub struct PreviewWindow {
    title: String,
    canvas: Mat,
    shown: bool,
    open: bool,
}

impl PreviewWindow {
    pub fn open(device_name: &str) -> Result<Self, DisplayError> {
        let title = format!("Capture ({device_name})");
        highgui::named_window(&title, highgui::WINDOW_NORMAL).map_err(DisplayError::WindowCreate)?;
        highgui::resize_window(&title, WINDOW_WIDTH, WINDOW_HEIGHT)
            .map_err(DisplayError::WindowCreate)?;
        let canvas =
            Mat::new_rows_cols_with_default(WINDOW_HEIGHT, WINDOW_WIDTH, CV_8UC3, Scalar::all(0.0))
                .map_err(DisplayError::WindowCreate)?;
        Ok(Self {
            title,
            canvas,
            shown: false,
            open: true,
        })
    }
}

impl Preview for PreviewWindow {
    fn poll_key(&mut self) -> Result<Option<i32>, DisplayError> {
        let key = highgui::wait_key(POLL_MS).map_err(DisplayError::Input)?;
        Ok((key >= 0).then_some(key & 0xFF))
    }

    fn should_close(&mut self) -> bool {
        // Some backends report the window invisible until the first imshow.
        if self.open && self.shown {
            // The property reads < 1 once the user closed the window.
            let visible = highgui::get_window_property(&self.title, highgui::WND_PROP_VISIBLE)
                .unwrap_or(0.0);
            self.open = visible >= 1.0;
        }
        !self.open
    }

    fn render(&mut self, panels: &[Option<PanelImage<'_>>; 4]) -> Result<(), DisplayError> {
        let (w, h) = (WINDOW_WIDTH as usize, WINDOW_HEIGHT as usize);
        let bytes = self.canvas.data_bytes_mut().map_err(DisplayError::Render)?;
        compose_mosaic(bytes, w, h, panels);
        highgui::imshow(&self.title, &self.canvas).map_err(DisplayError::Render)?;
        self.shown = true;
        Ok(())
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        let _ = highgui::destroy_window(&self.title);
    }
}
