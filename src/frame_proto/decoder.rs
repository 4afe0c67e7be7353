//! Reference decoder for the Frame Message stream.
//!
//! The sender never needs this; it exists for the viewer and to check the
//! encoder against. Lengths are always taken from the wire, never recomputed
//! from `width * height`.

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::Read;

use super::{
    FIXED_FIELDS_LEN, FrameError, FrameMessage, HEADER_LEN, MAGIC, MAX_FORMAT_LEN, MAX_PIXEL_LEN,
    ProtoError,
};

/// Upper bounds applied to the variable-length fields of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_format_len: usize,
    pub max_pixel_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_format_len: MAX_FORMAT_LEN,
            max_pixel_len: MAX_PIXEL_LEN,
        }
    }
}

fn checked_len(field: &'static str, raw: i32, max: usize) -> Result<usize, ProtoError> {
    let len = usize::try_from(raw).map_err(|_| ProtoError::NegativeLength { field, value: raw })?;
    if len > max {
        return Err(ProtoError::TooLarge {
            field,
            max,
            actual: len,
        });
    }
    Ok(len)
}

fn checked_dimension(field: &'static str, raw: i32) -> Result<i32, ProtoError> {
    if raw < 0 {
        return Err(ProtoError::NegativeLength { field, value: raw });
    }
    Ok(raw)
}

fn format_tag(bytes: Vec<u8>) -> Result<String, ProtoError> {
    if !bytes.is_ascii() {
        return Err(ProtoError::InvalidFormatTag);
    }
    String::from_utf8(bytes).map_err(|_| ProtoError::InvalidFormatTag)
}

/// Read exactly one Frame Message from a blocking stream.
///
/// A clean close before the first byte surfaces as `FrameError::Io` with
/// `UnexpectedEof`; see [`FrameError::is_eof`].
pub fn read_message<R: Read>(r: &mut R, limits: &DecodeLimits) -> Result<FrameMessage, FrameError> {
    let magic = r.read_i64::<BigEndian>()?;
    if magic != MAGIC {
        return Err(ProtoError::BadMagic(magic).into());
    }
    let timestamp_us = r.read_i64::<BigEndian>()?;
    let width = checked_dimension("width", r.read_i32::<BigEndian>()?)?;
    let height = checked_dimension("height", r.read_i32::<BigEndian>()?)?;

    let raw_format_len = r.read_i32::<BigEndian>()?;
    let format_len = checked_len("format_length", raw_format_len, limits.max_format_len)?;
    let mut format = vec![0u8; format_len];
    r.read_exact(&mut format)?;
    let format = format_tag(format)?;

    let raw_pixel_len = r.read_i32::<BigEndian>()?;
    let pixel_len = checked_len("pixel_data_length", raw_pixel_len, limits.max_pixel_len)?;
    let mut pixels = vec![0u8; pixel_len];
    r.read_exact(&mut pixels)?;

    Ok(FrameMessage {
        timestamp_us,
        width,
        height,
        format,
        pixels,
    })
}

/// Decode one message from the front of `buf`.
///
/// Returns the message and the number of bytes it occupied, so several
/// back-to-back messages can be walked in one buffer.
pub fn decode_message(
    buf: &[u8],
    limits: &DecodeLimits,
) -> Result<(FrameMessage, usize), FrameError> {
    let need = |needed: usize| -> Result<(), ProtoError> {
        if buf.len() < needed {
            Err(ProtoError::Truncated {
                needed,
                available: buf.len(),
            })
        } else {
            Ok(())
        }
    };

    need(HEADER_LEN)?;
    let magic = BigEndian::read_i64(&buf[0..8]);
    if magic != MAGIC {
        return Err(ProtoError::BadMagic(magic).into());
    }
    let timestamp_us = BigEndian::read_i64(&buf[8..16]);
    let width = checked_dimension("width", BigEndian::read_i32(&buf[16..20]))?;
    let height = checked_dimension("height", BigEndian::read_i32(&buf[20..24]))?;
    let format_len = checked_len(
        "format_length",
        BigEndian::read_i32(&buf[24..HEADER_LEN]),
        limits.max_format_len,
    )?;

    let fmt_end = HEADER_LEN + format_len;
    need(fmt_end + 4)?;
    let format = format_tag(buf[HEADER_LEN..fmt_end].to_vec())?;

    let pixel_len = checked_len(
        "pixel_data_length",
        BigEndian::read_i32(&buf[fmt_end..fmt_end + 4]),
        limits.max_pixel_len,
    )?;
    let total = FIXED_FIELDS_LEN + format_len + pixel_len;
    need(total)?;
    let pixels = buf[fmt_end + 4..total].to_vec();

    Ok((
        FrameMessage {
            timestamp_us,
            width,
            height,
            format,
            pixels,
        },
        total,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::frame_proto::encoder::{encode_i32, encode_message};
    use rand::Rng;
    use std::io::Cursor;

    #[test]
    fn round_trip_random_frames() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let w: i32 = rng.gen_range(0..48);
            let h: i32 = rng.gen_range(0..48);
            let ts: i64 = rng.r#gen();
            let mut pixels = vec![0u8; (w * h * 3) as usize];
            rng.fill(pixels.as_mut_slice());

            let buf = encode_message(ts, w, h, b"RGB", &pixels).unwrap();
            let (msg, used) = decode_message(&buf, &DecodeLimits::default()).unwrap();

            assert_eq!(used, buf.len());
            assert_eq!(msg.timestamp_us, ts);
            assert_eq!((msg.width, msg.height), (w, h));
            assert_eq!(msg.format, "RGB");
            assert_eq!(msg.pixels, pixels);
            assert!(msg.has_tight_rgb_payload());

            let streamed =
                read_message(&mut Cursor::new(&buf[..]), &DecodeLimits::default()).unwrap();
            assert_eq!(streamed, msg);
        }
    }

    #[test]
    fn trusts_pixel_length_over_dimensions() {
        // 2x2 RGBA tag with a payload that does not match w*h*3.
        let pixels = vec![9u8; 16];
        let buf = encode_message(5, 2, 2, b"RGBA", &pixels).unwrap();
        let (msg, used) = decode_message(&buf, &DecodeLimits::default()).unwrap();
        assert_eq!(used, 32 + 4 + 16);
        assert_eq!(msg.format, "RGBA");
        assert_eq!(msg.pixels.len(), 16);
        assert!(!msg.has_tight_rgb_payload());
    }

    #[test]
    fn tiny_payloads_decode_whole() {
        let limits = DecodeLimits::default();
        for pixels in [&[][..], &[7u8, 8, 9][..]] {
            let buf = encode_message(3, 1, 1, b"RGB", pixels).unwrap();
            let (msg, used) = decode_message(&buf, &limits).unwrap();
            assert_eq!(used, 32 + 3 + pixels.len());
            assert_eq!(used, buf.len());
            assert_eq!(msg.pixels, pixels);

            // A trailing message must not bleed into the first.
            let mut two = buf.to_vec();
            two.extend_from_slice(&buf);
            let (again, n) = decode_message(&two, &limits).unwrap();
            assert_eq!((again, n), (msg, used));
        }
    }

    #[test]
    fn walks_back_to_back_messages() {
        let mut stream = encode_message(1, 1, 1, b"RGB", &[1, 2, 3]).unwrap().to_vec();
        stream.extend_from_slice(&encode_message(2, 2, 1, b"RGB", &[4, 5, 6, 7, 8, 9]).unwrap());

        let limits = DecodeLimits::default();
        let (first, n) = decode_message(&stream, &limits).unwrap();
        let (second, m) = decode_message(&stream[n..], &limits).unwrap();
        assert_eq!(first.timestamp_us, 1);
        assert_eq!(second.timestamp_us, 2);
        assert_eq!(second.pixels, vec![4, 5, 6, 7, 8, 9]);
        assert_eq!(n + m, stream.len());

        let mut cur = Cursor::new(stream);
        assert_eq!(read_message(&mut cur, &limits).unwrap(), first);
        assert_eq!(read_message(&mut cur, &limits).unwrap(), second);
        let err = read_message(&mut cur, &limits).unwrap_err();
        assert!(err.is_eof(), "expected clean EOF, got {err:?}");
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = encode_message(1, 1, 1, b"RGB", &[0, 0, 0]).unwrap().to_vec();
        buf[0] ^= 0xFF;
        match decode_message(&buf, &DecodeLimits::default()) {
            Err(FrameError::Proto(ProtoError::BadMagic(_))) => {}
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn reports_truncation_with_needed_length() {
        let buf = encode_message(1, 2, 2, b"RGB", &[0u8; 12]).unwrap();
        let cut = &buf[..buf.len() - 5];
        match decode_message(cut, &DecodeLimits::default()) {
            Err(FrameError::Proto(ProtoError::Truncated { needed, available })) => {
                assert_eq!(needed, buf.len());
                assert_eq!(available, buf.len() - 5);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn rejects_oversized_and_negative_lengths() {
        let limits = DecodeLimits {
            max_format_len: 4,
            max_pixel_len: 8,
        };
        let buf = encode_message(1, 4, 1, b"RGB", &[0u8; 12]).unwrap();
        match decode_message(&buf, &limits) {
            Err(FrameError::Proto(ProtoError::TooLarge { field, max, actual })) => {
                assert_eq!(field, "pixel_data_length");
                assert_eq!((max, actual), (8, 12));
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }

        let mut neg = encode_message(1, 1, 1, b"RGB", &[0, 0, 0]).unwrap().to_vec();
        neg[24..28].copy_from_slice(&encode_i32(-3));
        match read_message(&mut Cursor::new(neg), &DecodeLimits::default()) {
            Err(FrameError::Proto(ProtoError::NegativeLength { field, value })) => {
                assert_eq!(field, "format_length");
                assert_eq!(value, -3);
            }
            other => panic!("expected NegativeLength, got {other:?}"),
        }
    }
}
