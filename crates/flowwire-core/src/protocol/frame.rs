//! Frame codec (panic-free).
//!
//! Wire layout, contiguous, no padding:
//!
//! | offset | len | field                                   |
//! |--------|-----|-----------------------------------------|
//! | 0      | 1   | version                                 |
//! | 1      | 1   | kind tag                                |
//! | 2      | 1   | wait flag                               |
//! | 3      | 36  | correlation id, hyphenated hex text     |
//! | 39     | ..  | payload                                 |
//!
//! Parsing rules:
//! - Never index (`buf[0]`); use `Buf` and `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.
//! - No logging here; the caller decides what a bad frame means.
//!
//! Frames are not self-delimiting. The transport hands over exactly one
//! frame per call.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use uuid::Uuid;

use super::{Message, MessageKind, PROTOCOL_VERSION};
use crate::error::FrameError;

/// Length of the id field: canonical text form, not the raw 16 bytes.
pub const ID_TEXT_LEN: usize = 36;

/// version + kind + wait flag + id.
pub const HEADER_LEN: usize = 3 + ID_TEXT_LEN;

/// Encode a message. Total length is always `HEADER_LEN + payload.len()`.
pub fn encode_frame(msg: &Message) -> Bytes {
    let payload = msg.payload();
    let mut out = BytesMut::with_capacity(HEADER_LEN + payload.len());

    out.put_u8(PROTOCOL_VERSION);
    out.put_u8(msg.kind().as_u8());
    out.put_u8(msg.wait_intercept());

    let mut id_buf = Uuid::encode_buffer();
    let id_text = msg.id().hyphenated().encode_lower(&mut id_buf);
    out.put_slice(id_text.as_bytes());

    out.put_slice(payload);
    out.freeze()
}

/// Decode one frame received from a peer.
///
/// Checks run in header order, so the first problem found is the one
/// reported. The payload is a zero-copy slice of `buf`.
pub fn decode_frame(mut buf: Bytes) -> Result<Message, FrameError> {
    if buf.remaining() < HEADER_LEN {
        return Err(FrameError::TooShort {
            len: buf.remaining(),
        });
    }

    let v = buf.get_u8();
    if v != PROTOCOL_VERSION {
        return Err(FrameError::UnsupportedVersion(v));
    }

    let kind = MessageKind::try_from(buf.get_u8())?;
    let wait_intercept = buf.get_u8();

    let id_text = buf.split_to(ID_TEXT_LEN);
    let id = Uuid::try_parse_ascii(&id_text).map_err(|_| FrameError::MalformedCorrelationId)?;

    // Remaining bytes are payload.
    Ok(Message::new(kind, id, buf).with_wait_intercept(wait_intercept))
}

/// Decode from a borrowed slice (copies once into an owned buffer).
pub fn decode_frame_slice(data: &[u8]) -> Result<Message, FrameError> {
    decode_frame(Bytes::copy_from_slice(data))
}
