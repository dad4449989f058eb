//! Protocol modules.
//!
//! One frame carries one message:
//! - a fixed 39-byte header (version, kind, wait flag, 36-byte text id),
//! - followed by an opaque payload whose meaning depends on the kind.
//!
//! The parser is panic-free: malformed input is reported as `FrameError`
//! instead of panicking or indexing raw buffers.

pub mod adapter;
pub mod command;
pub mod frame;
pub mod kind;
pub mod message;

pub use command::Command;
pub use frame::{decode_frame, encode_frame, HEADER_LEN};
pub use kind::{KindCategory, MessageKind};
pub use message::Message;

/// The only protocol version spoken on the wire.
pub const PROTOCOL_VERSION: u8 = 1;
