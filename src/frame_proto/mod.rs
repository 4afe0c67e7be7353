//! Frame Message wire format: constants, encoder, reference decoder.
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod frame_message;

pub use constants::*;
pub use decoder::{DecodeLimits, decode_message, read_message};
pub use encoder::{encode_i32, encode_i64, encode_message, encoded_len};
pub use errors::{FrameError, ProtoError};
pub use frame_message::FrameMessage;
