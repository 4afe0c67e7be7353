use crate::frame_source::StreamKind;

/// Local view toggles. They only choose which stream each preview panel
/// shows and never touch what goes on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    pub align_depth_to_color: bool,
    pub align_color_to_depth: bool,
    pub color_rectification_enabled: bool,
}

impl DisplayConfig {
    /// Top-left panel.
    pub const fn color_panel_stream(&self) -> StreamKind {
        if self.align_color_to_depth {
            StreamKind::ColorAlignedToDepth
        } else if self.color_rectification_enabled {
            StreamKind::RectifiedColor
        } else {
            StreamKind::Color
        }
    }

    /// Top-right panel.
    pub const fn depth_panel_stream(&self) -> StreamKind {
        match (self.align_depth_to_color, self.color_rectification_enabled) {
            (true, true) => StreamKind::DepthAlignedToRectifiedColor,
            (true, false) => StreamKind::DepthAlignedToColor,
            (false, _) => StreamKind::Depth,
        }
    }

    /// Streams for the 2x2 mosaic, row-major.
    pub const fn panel_streams(&self) -> [StreamKind; 4] {
        [
            self.color_panel_stream(),
            self.depth_panel_stream(),
            StreamKind::Infrared,
            StreamKind::Infrared2,
        ]
    }
}
