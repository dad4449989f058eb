//! Command payloads sent by the consumer to the backend.

use bytes::Bytes;
use uuid::Uuid;

use super::{KindCategory, Message, MessageKind};
use crate::error::{FlowWireError, Result};
use crate::flow::RequestMeta;

/// A decoded command message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the paused request of flow `id` before it proceeds.
    ChangeRequest { id: Uuid, request: RequestMeta },
    /// New URI pattern deciding which flows pause for inspection.
    ChangeInterceptUri(String),
}

impl Command {
    /// Interpret a command-kind message. Event kinds are a `KindMismatch`.
    pub fn decode(msg: &Message) -> Result<Self> {
        match msg.kind() {
            MessageKind::ChangeRequest => {
                let request: RequestMeta = serde_json::from_slice(msg.payload())
                    .map_err(|e| FlowWireError::InvalidPayload(format!("change_request: {e}")))?;
                Ok(Command::ChangeRequest {
                    id: msg.id(),
                    request,
                })
            }
            MessageKind::ChangeInterceptUri => {
                let uri = std::str::from_utf8(msg.payload())
                    .map_err(|e| FlowWireError::InvalidPayload(format!("change_intercept_uri: {e}")))?;
                Ok(Command::ChangeInterceptUri(uri.to_string()))
            }
            other => {
                debug_assert_eq!(other.category(), KindCategory::Event);
                Err(FlowWireError::KindMismatch {
                    expected: "command",
                    actual: other,
                })
            }
        }
    }
}

impl Message {
    /// `ChangeRequest` command for flow `id`.
    pub fn change_request(id: Uuid, request: &RequestMeta) -> Result<Self> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| FlowWireError::Internal(format!("encode change_request: {e}")))?;
        Ok(Message::new(MessageKind::ChangeRequest, id, payload))
    }

    /// `ChangeInterceptUri` command. The id is not tied to a flow; nil is fine.
    pub fn change_intercept_uri(id: Uuid, uri: &str) -> Self {
        Message::new(
            MessageKind::ChangeInterceptUri,
            id,
            Bytes::copy_from_slice(uri.as_bytes()),
        )
    }
}
