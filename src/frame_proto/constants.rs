/// Wire constants for the Frame Message stream.
///
/// Layout (all integers big-endian):
///   [magic: i64][timestamp_us: i64][width: i32][height: i32]
///   [format_len: i32][format: format_len bytes]
///   [pixel_len: i32][pixels: pixel_len bytes]
pub const MAGIC: i64 = 0x1792_3349_ab10_ea9a;

/// Bytes taken by the fixed integer fields: 8 + 8 + 4 + 4 + 4 + 4.
pub const FIXED_FIELDS_LEN: usize = 32;

/// Fixed fields ahead of the format tag: magic, timestamp, width, height, format length.
pub const HEADER_LEN: usize = 28;

/// Largest tag or payload a length field can carry.
pub const MAX_WIRE_LEN: usize = i32::MAX as usize;

/// Pixel layout tag this producer always emits.
pub const RGB_FORMAT: &str = "RGB";

/// Bytes per pixel for `RGB_FORMAT`.
pub const RGB_BYTES_PER_PIXEL: usize = 3;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Default cap on a decoded format tag.
pub const MAX_FORMAT_LEN: usize = 16;

/// Default cap on a decoded pixel payload (to avoid OOM).
pub const MAX_PIXEL_LEN: usize = 64 * 1_048_576; // 64 MiB
