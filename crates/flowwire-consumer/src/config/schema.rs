use serde::Deserialize;

use flowwire_core::error::{FlowWireError, Result};
use flowwire_core::protocol::{MessageKind, HEADER_LEN};

const MAX_FRAME_CEILING: usize = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    pub version: u32,

    #[serde(default)]
    pub consumer: ConsumerSection,
}

impl ConsumerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FlowWireError::UnsupportedVersion);
        }
        self.consumer.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerSection {
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    #[serde(default = "default_allowed_kinds")]
    pub allowed_kinds: Vec<MessageKind>,

    /// Reject body/response messages for flows never announced by a `Request`.
    #[serde(default)]
    pub reject_unknown_flows: bool,

    /// Forget a flow once its `ResponseBody` has been handled.
    #[serde(default = "default_evict_completed")]
    pub evict_completed: bool,
}

impl Default for ConsumerSection {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            allowed_kinds: default_allowed_kinds(),
            reject_unknown_flows: false,
            evict_completed: default_evict_completed(),
        }
    }
}

impl ConsumerSection {
    pub fn validate(&self) -> Result<()> {
        if !(HEADER_LEN..=MAX_FRAME_CEILING).contains(&self.max_frame_bytes) {
            return Err(FlowWireError::BadRequest(format!(
                "consumer.max_frame_bytes must be between {HEADER_LEN} and {MAX_FRAME_CEILING}"
            )));
        }
        if self.allowed_kinds.is_empty() {
            return Err(FlowWireError::BadRequest(
                "consumer.allowed_kinds must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_frame_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_evict_completed() -> bool {
    true
}
fn default_allowed_kinds() -> Vec<MessageKind> {
    MessageKind::ALL.to_vec()
}
