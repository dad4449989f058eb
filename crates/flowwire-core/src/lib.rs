//! flowwire core: the binary framing protocol between a traffic-inspection
//! backend and its consumers.
//!
//! This crate defines the message registry, the frame codec, the adapters that
//! project intercepted flows into messages, and the error surface shared by
//! every flowwire crate. It carries no transport or runtime dependencies; the
//! connection that moves frames around is someone else's job.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Frames arrive from an untrusted peer, so every decode path surfaces a
//! `FrameError` instead of indexing or crashing. The one exception is
//! metadata serialization in [`protocol::adapter`], which fails only when the
//! flow source breaks its contract.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod flow;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, FlowWireError, FrameError, Result};
pub use protocol::{Message, MessageKind, PROTOCOL_VERSION};
