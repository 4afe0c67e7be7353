use std::fmt;

/// Streams a depth/color camera can expose. The last four are derived views
/// of the native ones (rectified, or reprojected into the other sensor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Color,
    Depth,
    Infrared,
    Infrared2,
    RectifiedColor,
    ColorAlignedToDepth,
    DepthAlignedToColor,
    DepthAlignedToRectifiedColor,
}

impl StreamKind {
    /// Streams that are enabled directly on a device.
    pub const NATIVE: [StreamKind; 4] = [
        StreamKind::Depth,
        StreamKind::Color,
        StreamKind::Infrared,
        StreamKind::Infrared2,
    ];

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            StreamKind::Color | StreamKind::RectifiedColor | StreamKind::ColorAlignedToDepth => 3,
            StreamKind::Depth
            | StreamKind::DepthAlignedToColor
            | StreamKind::DepthAlignedToRectifiedColor => 2,
            StreamKind::Infrared | StreamKind::Infrared2 => 1,
        }
    }

    /// The native stream a derived view is computed from.
    pub const fn native(self) -> StreamKind {
        match self {
            StreamKind::Color | StreamKind::RectifiedColor | StreamKind::ColorAlignedToDepth => {
                StreamKind::Color
            }
            StreamKind::Depth
            | StreamKind::DepthAlignedToColor
            | StreamKind::DepthAlignedToRectifiedColor => StreamKind::Depth,
            StreamKind::Infrared => StreamKind::Infrared,
            StreamKind::Infrared2 => StreamKind::Infrared2,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamKind::Color => "color",
            StreamKind::Depth => "depth",
            StreamKind::Infrared => "infrared",
            StreamKind::Infrared2 => "infrared2",
            StreamKind::RectifiedColor => "rectified_color",
            StreamKind::ColorAlignedToDepth => "color_aligned_to_depth",
            StreamKind::DepthAlignedToColor => "depth_aligned_to_color",
            StreamKind::DepthAlignedToRectifiedColor => "depth_aligned_to_rectified_color",
        };
        f.write_str(s)
    }
}

/// Requested stream mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPreset {
    /// 640x480 at 30 fps.
    BestQuality,
    LargestImage,
    HighestFramerate,
    /// Whatever the device offers.
    Any,
    Explicit { width: u32, height: u32, fps: u32 },
}

impl StreamPreset {
    /// Concrete (width, height, fps) for presets that name one.
    pub const fn resolve(self) -> Option<(u32, u32, u32)> {
        match self {
            StreamPreset::BestQuality => Some((640, 480, 30)),
            StreamPreset::LargestImage => Some((1920, 1080, 30)),
            StreamPreset::HighestFramerate => Some((640, 480, 60)),
            StreamPreset::Any => None,
            StreamPreset::Explicit { width, height, fps } => Some((width, height, fps)),
        }
    }
}

impl fmt::Display for StreamPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamPreset::BestQuality => f.write_str("best_quality"),
            StreamPreset::LargestImage => f.write_str("largest_image"),
            StreamPreset::HighestFramerate => f.write_str("highest_framerate"),
            StreamPreset::Any => f.write_str("any"),
            StreamPreset::Explicit { width, height, fps } => write!(f, "{width}x{height}@{fps}"),
        }
    }
}

/// Geometry of an enabled stream. Field of view is unknown for plain UVC cameras.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamIntrinsics {
    pub width: u32,
    pub height: u32,
    /// Horizontal and vertical field of view in degrees.
    pub fov: Option<(f32, f32)>,
}

impl StreamIntrinsics {
    pub fn frame_len(&self, kind: StreamKind) -> usize {
        self.width as usize * self.height as usize * kind.bytes_per_pixel()
    }
}

/// Boolean device controls reachable from the preview keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOption {
    EmitterEnabled,
    AutoExposureEnabled,
}

impl fmt::Display for DeviceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceOption::EmitterEnabled => f.write_str("emitter"),
            DeviceOption::AutoExposureEnabled => f.write_str("auto exposure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_streams_map_to_native() {
        assert_eq!(StreamKind::RectifiedColor.native(), StreamKind::Color);
        assert_eq!(StreamKind::DepthAlignedToRectifiedColor.native(), StreamKind::Depth);
        assert_eq!(StreamKind::Infrared2.native(), StreamKind::Infrared2);
    }

    #[test]
    fn vga_color_frame_len() {
        let i = StreamIntrinsics {
            width: 640,
            height: 480,
            fov: None,
        };
        assert_eq!(i.frame_len(StreamKind::Color), 921_600);
        assert_eq!(i.frame_len(StreamKind::Depth), 614_400);
        assert_eq!(StreamPreset::BestQuality.resolve(), Some((640, 480, 30)));
        assert_eq!(StreamPreset::Any.resolve(), None);
    }
}
