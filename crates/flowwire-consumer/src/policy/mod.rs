//! Frame policy.
//!
//! Applied in two steps around decode: a length check on raw bytes before any
//! parsing, then a kind allowlist once the header is known.

pub mod engine;

pub use engine::{FramePolicy, PolicyDecision};
