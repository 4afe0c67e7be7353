use std::collections::VecDeque;

use crate::frame_source::StreamKind;

use super::{DisplayError, PanelImage};

/// Windowing side of the capture loop.
pub trait Preview {
    /// Next pending key press, if any. Also pumps window events.
    fn poll_key(&mut self) -> Result<Option<i32>, DisplayError>;

    /// True once the user asked to close the window.
    fn should_close(&mut self) -> bool;

    fn render(&mut self, panels: &[Option<PanelImage<'_>>; 4]) -> Result<(), DisplayError>;
}

/// No window at all. Keys come from a script and the "window" can be told
/// to close after a number of renders.
#[derive(Debug, Default)]
pub struct HeadlessPreview {
    keys: VecDeque<i32>,
    close_after: Option<u64>,
    renders: u64,
    last_streams: Vec<StreamKind>,
}

impl HeadlessPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue key presses, one per poll.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = i32>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn close_after(mut self, renders: u64) -> Self {
        self.close_after = Some(renders);
        self
    }

    pub const fn renders(&self) -> u64 {
        self.renders
    }

    /// Streams that had data in the most recent render.
    pub fn last_streams(&self) -> &[StreamKind] {
        &self.last_streams
    }
}

impl Preview for HeadlessPreview {
    fn poll_key(&mut self) -> Result<Option<i32>, DisplayError> {
        Ok(self.keys.pop_front())
    }

    fn should_close(&mut self) -> bool {
        self.close_after.is_some_and(|n| self.renders >= n)
    }

    fn render(&mut self, panels: &[Option<PanelImage<'_>>; 4]) -> Result<(), DisplayError> {
        self.renders += 1;
        self.last_streams = panels.iter().flatten().map(|p| p.stream).collect();
        Ok(())
    }
}
