use flowwire_core::error::ErrorCode;
use flowwire_core::MessageKind;

use crate::config::ConsumerSection;

/// Decision from policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Pass,
    /// Ignore silently.
    Drop,
    Reject { code: ErrorCode, msg: &'static str },
}

/// Construct once at startup, then share.
#[derive(Debug, Clone)]
pub struct FramePolicy {
    max_frame_bytes: usize,
    allowed: [bool; 256],
}

impl FramePolicy {
    pub fn new(cfg: &ConsumerSection) -> Self {
        let mut allowed = [false; 256];
        for kind in &cfg.allowed_kinds {
            allowed[usize::from(kind.as_u8())] = true;
        }
        Self {
            max_frame_bytes: cfg.max_frame_bytes,
            allowed,
        }
    }

    /// Cheap check on raw frame length, before decode.
    pub fn check_len(&self, bytes_len: usize) -> PolicyDecision {
        if bytes_len > self.max_frame_bytes {
            return PolicyDecision::Reject {
                code: ErrorCode::BadRequest,
                msg: "frame exceeds max_frame_bytes",
            };
        }
        PolicyDecision::Pass
    }

    /// Kind allowlist, after decode. Disallowed kinds are dropped, not rejected.
    pub fn check_kind(&self, kind: MessageKind) -> PolicyDecision {
        if self.allowed[usize::from(kind.as_u8())] {
            PolicyDecision::Pass
        } else {
            PolicyDecision::Drop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(max: usize, kinds: Vec<MessageKind>) -> ConsumerSection {
        ConsumerSection {
            max_frame_bytes: max,
            allowed_kinds: kinds,
            reject_unknown_flows: false,
            evict_completed: true,
        }
    }

    #[test]
    fn length_limit_is_inclusive() {
        let p = FramePolicy::new(&section(64, MessageKind::ALL.to_vec()));
        assert_eq!(p.check_len(64), PolicyDecision::Pass);
        assert!(matches!(p.check_len(65), PolicyDecision::Reject { .. }));
    }

    #[test]
    fn kinds_outside_allowlist_are_dropped() {
        let p = FramePolicy::new(&section(1024, vec![MessageKind::Request, MessageKind::Response]));
        assert_eq!(p.check_kind(MessageKind::Request), PolicyDecision::Pass);
        assert_eq!(p.check_kind(MessageKind::RequestBody), PolicyDecision::Drop);
        assert_eq!(p.check_kind(MessageKind::ChangeInterceptUri), PolicyDecision::Drop);
    }
}
