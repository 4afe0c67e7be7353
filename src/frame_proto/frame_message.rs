use bytes::Bytes;

use super::{ProtoError, RGB_BYTES_PER_PIXEL, RGB_FORMAT, encoder};

/// One color image plus its send-time timestamp, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMessage {
    /// Microseconds since the Unix epoch, taken when the frame was sent.
    pub timestamp_us: i64,
    pub width: i32,
    pub height: i32,
    /// Pixel layout tag, e.g. `"RGB"`.
    pub format: String,
    pub pixels: Vec<u8>,
}

impl FrameMessage {
    pub fn rgb(timestamp_us: i64, width: i32, height: i32, pixels: Vec<u8>) -> Self {
        Self {
            timestamp_us,
            width,
            height,
            format: RGB_FORMAT.to_owned(),
            pixels,
        }
    }

    /// # Errors
    /// See [`encoder::encode_message`].
    pub fn encode(&self) -> Result<Bytes, ProtoError> {
        encoder::encode_message(
            self.timestamp_us,
            self.width,
            self.height,
            self.format.as_bytes(),
            &self.pixels,
        )
    }

    pub fn encoded_len(&self) -> usize {
        encoder::encoded_len(self.format.len(), self.pixels.len())
    }

    pub fn is_rgb(&self) -> bool {
        self.format == RGB_FORMAT
    }

    /// Whether the payload length matches `width * height * 3` for an RGB tag.
    /// Receivers still trust the transmitted length; this is only a sanity hint.
    pub fn has_tight_rgb_payload(&self) -> bool {
        let (Ok(w), Ok(h)) = (usize::try_from(self.width), usize::try_from(self.height)) else {
            return false;
        };
        self.is_rgb() && w * h * RGB_BYTES_PER_PIXEL == self.pixels.len()
    }
}
