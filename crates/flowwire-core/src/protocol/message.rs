//! In-memory message value.

use bytes::Bytes;
use uuid::Uuid;

use super::{MessageKind, PROTOCOL_VERSION};

/// One protocol unit.
///
/// Everything except the wait flag is fixed at construction. The payload is a
/// cheap `Bytes` handle; a decoded message shares the inbound frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    id: Uuid,
    wait_intercept: u8,
    payload: Bytes,
}

impl Message {
    /// Build a message with the wait flag cleared.
    pub fn new(kind: MessageKind, id: Uuid, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            id,
            wait_intercept: 0,
            payload: payload.into(),
        }
    }

    pub fn with_wait_intercept(mut self, flag: u8) -> Self {
        self.wait_intercept = flag;
        self
    }

    /// Mark (non-zero) or clear (zero) the "paused awaiting a decision" flag.
    pub fn set_wait_intercept(&mut self, flag: u8) {
        self.wait_intercept = flag;
    }

    /// Always [`PROTOCOL_VERSION`].
    pub fn version(&self) -> u8 {
        PROTOCOL_VERSION
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Correlation id of the flow this message belongs to.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Raw wait flag byte.
    pub fn wait_intercept(&self) -> u8 {
        self.wait_intercept
    }

    /// True when the flow is paused awaiting an interception decision.
    pub fn is_waiting(&self) -> bool {
        self.wait_intercept != 0
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_flag_defaults_to_zero_and_can_be_set() {
        let mut m = Message::new(MessageKind::Request, Uuid::nil(), &b"{}"[..]);
        assert_eq!(m.wait_intercept(), 0);
        assert!(!m.is_waiting());

        m.set_wait_intercept(1);
        assert!(m.is_waiting());
        assert_eq!(m.version(), PROTOCOL_VERSION);
    }

    #[test]
    fn into_payload_hands_back_the_buffer() {
        let payload = Bytes::from_static(b"raw body");
        let m = Message::new(MessageKind::RequestBody, Uuid::nil(), payload.clone());
        assert_eq!(m.into_payload(), payload);
    }
}
