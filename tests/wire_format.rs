use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};
use tcpcapture::frame_proto::{
    DecodeLimits, FrameError, MAGIC, decode_message, encode_message, read_message,
};

fn hand_built(ts: i64, width: i32, height: i32, format: &[u8], pixels: &[u8]) -> Vec<u8> {
    let mut msg = Vec::new();
    msg.write_i64::<BigEndian>(MAGIC).unwrap();
    msg.write_i64::<BigEndian>(ts).unwrap();
    msg.write_i32::<BigEndian>(width).unwrap();
    msg.write_i32::<BigEndian>(height).unwrap();
    msg.write_i32::<BigEndian>(format.len() as i32).unwrap();
    msg.write_all(format).unwrap();
    msg.write_i32::<BigEndian>(pixels.len() as i32).unwrap();
    msg.write_all(pixels).unwrap();
    msg
}

/// Hands out at most `chunk` bytes per read, like a slow socket.
struct Trickle {
    inner: Cursor<Vec<u8>>,
    chunk: usize,
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..n])
    }
}

#[test]
fn encoder_matches_hand_built_bytes() {
    let pixels: Vec<u8> = (0..4 * 2 * 3).map(|i| i as u8).collect();
    let ts = 1_700_000_000_123_456;
    let ours = encode_message(ts, 4, 2, b"RGB", &pixels).unwrap();
    assert_eq!(&ours[..], &hand_built(ts, 4, 2, b"RGB", &pixels)[..]);
}

#[test]
fn vga_frame_layout() {
    let pixels = vec![0x5Au8; 640 * 480 * 3];
    let msg = encode_message(1_700_000_000_000_000, 640, 480, b"RGB", &pixels).unwrap();

    assert_eq!(msg.len(), 921_635);
    assert_eq!(&msg[..8], &[0x17, 0x92, 0x33, 0x49, 0xAB, 0x10, 0xEA, 0x9A]);
    // width, height, format length, "RGB", pixel length
    assert_eq!(&msg[16..20], &[0x00, 0x00, 0x02, 0x80]);
    assert_eq!(&msg[20..24], &[0x00, 0x00, 0x01, 0xE0]);
    assert_eq!(&msg[24..28], &[0, 0, 0, 3]);
    assert_eq!(&msg[28..31], b"RGB");
    assert_eq!(&msg[31..35], &921_600i32.to_be_bytes());
}

#[test]
fn slow_stream_of_messages_decodes_in_order() {
    let mut wire = Vec::new();
    for ts in 0..3i64 {
        wire.extend_from_slice(&hand_built(ts, 1, 1, b"RGB", &[ts as u8; 3]));
    }
    let mut src = Trickle {
        inner: Cursor::new(wire),
        chunk: 5,
    };

    let limits = DecodeLimits::default();
    for ts in 0..3i64 {
        let msg = read_message(&mut src, &limits).unwrap();
        assert_eq!(msg.timestamp_us, ts);
        assert_eq!(msg.pixels, vec![ts as u8; 3]);
        assert!(msg.is_rgb());
    }
    let end = read_message(&mut src, &limits).unwrap_err();
    assert!(matches!(end, FrameError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    assert!(end.is_eof());
}

#[test]
fn foreign_format_tags_pass_through() {
    let buf = hand_built(9, 2, 1, b"YUYV", &[1, 2, 3, 4]);
    let (msg, used) = decode_message(&buf, &DecodeLimits::default()).unwrap();
    assert_eq!(used, buf.len());
    assert_eq!(msg.format, "YUYV");
    assert!(!msg.is_rgb());
    assert!(!msg.has_tight_rgb_payload());
}
