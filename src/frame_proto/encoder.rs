use bytes::{BufMut, Bytes, BytesMut};

use super::{FIXED_FIELDS_LEN, MAGIC, MAX_WIRE_LEN, ProtoError};

/// Big-endian two's-complement encoding of a 32-bit integer.
pub fn encode_i32(value: i32) -> [u8; 4] {
    let v = value as u32;
    [
        (v >> 24) as u8,
        (v >> 16) as u8,
        (v >> 8) as u8,
        v as u8,
    ]
}

/// Big-endian encoding of a 64-bit integer, high word first.
pub fn encode_i64(value: i64) -> [u8; 8] {
    let high = (value >> 32) as i32;
    let low = value as i32;
    let mut out = [0u8; 8];
    out[0..4].copy_from_slice(&encode_i32(high));
    out[4..8].copy_from_slice(&encode_i32(low));
    out
}

/// Exact size of an encoded message for the given tag and payload sizes.
pub const fn encoded_len(format_len: usize, pixel_len: usize) -> usize {
    FIXED_FIELDS_LEN + format_len + pixel_len
}

fn wire_len(field: &'static str, len: usize) -> Result<i32, ProtoError> {
    i32::try_from(len).map_err(|_| ProtoError::TooLarge {
        field,
        max: MAX_WIRE_LEN,
        actual: len,
    })
}

/// Serialize one Frame Message into a fresh buffer.
///
/// Field order: magic, timestamp, width, height, format length, format,
/// pixel length, pixels.
///
/// # Errors
/// `ProtoError::TooLarge` if the tag or the payload does not fit an `i32`
/// length field.
pub fn encode_message(
    timestamp_us: i64,
    width: i32,
    height: i32,
    format_tag: &[u8],
    pixel_bytes: &[u8],
) -> Result<Bytes, ProtoError> {
    let format_len = wire_len("format_length", format_tag.len())?;
    let pixel_len = wire_len("pixel_data_length", pixel_bytes.len())?;

    let mut buf = BytesMut::with_capacity(encoded_len(format_tag.len(), pixel_bytes.len()));
    buf.put_slice(&encode_i64(MAGIC));
    buf.put_slice(&encode_i64(timestamp_us));
    buf.put_slice(&encode_i32(width));
    buf.put_slice(&encode_i32(height));
    buf.put_slice(&encode_i32(format_len));
    buf.put_slice(format_tag);
    buf.put_slice(&encode_i32(pixel_len));
    buf.put_slice(pixel_bytes);
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::frame_proto::RGB_FORMAT;

    #[test]
    fn encode_i32_is_big_endian() {
        assert_eq!(encode_i32(0x0102_0304), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(encode_i32(-1), [0xFF; 4]);
        assert_eq!(encode_i32(i32::MIN), [0x80, 0, 0, 0]);
        assert_eq!(encode_i32(640), 640i32.to_be_bytes());
    }

    #[test]
    fn encode_i64_matches_native_big_endian_at_boundaries() {
        for v in [0, -1, MAGIC, i64::MIN, i64::MAX, 1_700_000_000_000_000] {
            assert_eq!(encode_i64(v), v.to_be_bytes(), "value {v:#x}");
        }
    }

    #[test]
    fn vga_rgb_frame_has_expected_size_and_prefix() {
        let pixels = vec![0x7Fu8; 640 * 480 * 3];
        let ts = 1_700_000_000_000_000;
        let buf = encode_message(ts, 640, 480, RGB_FORMAT.as_bytes(), &pixels).unwrap();

        assert_eq!(buf.len(), 921_635);
        assert_eq!(&buf[0..8], &[0x17, 0x92, 0x33, 0x49, 0xAB, 0x10, 0xEA, 0x9A]);
        assert_eq!(&buf[8..16], &1_700_000_000_000_000i64.to_be_bytes());
        assert_eq!(&buf[16..20], &[0, 0, 0x02, 0x80]);
        assert_eq!(&buf[20..24], &[0, 0, 0x01, 0xE0]);
        assert_eq!(&buf[24..28], &[0, 0, 0, 3]);
        assert_eq!(&buf[28..31], b"RGB");
        assert_eq!(&buf[31..35], &921_600i32.to_be_bytes());
        assert!(buf[35..].iter().all(|&b| b == 0x7F));
    }

    #[test]
    fn length_law_holds_for_odd_tags() {
        let cases: [(&[u8], usize); 4] = [(b"", 0), (b"Y", 7), (b"RGBA", 16), (b"BGR", 1)];
        for (tag, n) in cases {
            let pixels = vec![1u8; n];
            let buf = encode_message(0, 1, 1, tag, &pixels).unwrap();
            assert_eq!(buf.len(), 32 + tag.len() + n);
            assert_eq!(buf.len(), encoded_len(tag.len(), n));
        }
    }

    #[test]
    fn lengths_beyond_i32_are_rejected() {
        assert_eq!(wire_len("pixel_data_length", MAX_WIRE_LEN).unwrap(), i32::MAX);
        match wire_len("pixel_data_length", MAX_WIRE_LEN + 1) {
            Err(ProtoError::TooLarge { field, max, actual }) => {
                assert_eq!(field, "pixel_data_length");
                assert_eq!(max, 2_147_483_647);
                assert_eq!(actual, 2_147_483_648);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }
}
