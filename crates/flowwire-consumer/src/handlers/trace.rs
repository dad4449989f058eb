use async_trait::async_trait;

use flowwire_core::error::Result;
use flowwire_core::{Message, MessageKind};

use crate::dispatch::MessageHandler;

/// Logs every message at debug level. Useful to prove routing.
pub struct TraceHandler;

#[async_trait]
impl MessageHandler for TraceHandler {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn kinds(&self) -> &'static [MessageKind] {
        &MessageKind::ALL
    }

    async fn handle(&self, msg: &Message) -> Result<()> {
        tracing::debug!(
            id = %msg.id(),
            kind = %msg.kind(),
            waiting = msg.is_waiting(),
            len = msg.payload().len(),
            "message"
        );
        Ok(())
    }
}
