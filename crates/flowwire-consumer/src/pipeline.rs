//! Decode-once pipeline: raw frame -> policy -> decode -> policy -> dispatch.
//!
//! The transport hands over one frame per call. Decode failures are returned
//! to the caller, which decides whether to drop the connection; there is no
//! resynchronization inside a byte stream.

use std::sync::Arc;

use bytes::Bytes;

use flowwire_core::error::{ErrorCode, Result};
use flowwire_core::protocol::decode_frame;
use flowwire_core::MessageKind;

use crate::config::ConsumerSection;
use crate::dispatch::Dispatcher;
use crate::policy::{FramePolicy, PolicyDecision};

/// What happened to one frame that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dispatched(MessageKind),
    Dropped(MessageKind),
    Rejected { code: ErrorCode, msg: &'static str },
}

pub struct Pipeline {
    policy: FramePolicy,
    dispatcher: Arc<Dispatcher>,
}

impl Pipeline {
    pub fn new(cfg: &ConsumerSection, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            policy: FramePolicy::new(cfg),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub async fn process(&self, frame: Bytes) -> Result<Outcome> {
        // cheap-first: length before decode
        let bytes_len = frame.len();
        if let PolicyDecision::Reject { code, msg } = self.policy.check_len(bytes_len) {
            tracing::warn!(len = bytes_len, code = code.as_str(), msg, "frame rejected");
            return Ok(Outcome::Rejected { code, msg });
        }

        let msg = decode_frame(frame)?;
        let kind = msg.kind();

        if self.policy.check_kind(kind) == PolicyDecision::Drop {
            tracing::debug!(id = %msg.id(), %kind, "kind not allowed, dropped");
            return Ok(Outcome::Dropped(kind));
        }

        self.dispatcher.dispatch(&msg).await?;
        Ok(Outcome::Dispatched(kind))
    }
}
