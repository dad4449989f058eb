use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use flowwire_core::error::{FlowWireError, Result};
use flowwire_core::{Message, MessageKind};

/// Handles decoded messages of the kinds it declares.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn kinds(&self) -> &'static [MessageKind];
    async fn handle(&self, msg: &Message) -> Result<()>;
}

/// Routes a message to every handler registered for its kind, in
/// registration order.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<MessageKind, Vec<Arc<dyn MessageHandler>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn MessageHandler>) {
        for kind in handler.kinds() {
            self.handlers
                .entry(*kind)
                .or_default()
                .push(Arc::clone(&handler));
        }
    }

    pub fn registered_kinds(&self) -> Vec<MessageKind> {
        let mut kinds: Vec<MessageKind> = self.handlers.iter().map(|e| *e.key()).collect();
        kinds.sort_by_key(|k| k.as_u8());
        kinds
    }

    /// Run the handlers for `msg.kind()` in order, stopping at the first
    /// error. Handlers before the failing one have already run and are not
    /// rolled back; handlers after it do not see the message.
    pub async fn dispatch(&self, msg: &Message) -> Result<()> {
        let kind = msg.kind();
        // Clone the list out so no map guard is held across an await.
        let handlers = self
            .handlers
            .get(&kind)
            .map(|e| e.value().clone())
            .ok_or_else(|| FlowWireError::BadRequest(format!("no handler for kind: {kind}")))?;

        for h in handlers {
            if let Err(e) = h.handle(msg).await {
                tracing::debug!(handler = h.name(), %kind, id = %msg.id(), error = %e, "handler failed");
                return Err(e);
            }
        }
        Ok(())
    }
}
