//! Message kind registry.
//!
//! The set is closed: tags are reserved by category (events 1..=10, mutation
//! commands 11..=20, interception control 21..) and a decoder rejects any tag
//! it does not know rather than guessing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Category of a message kind. Informative only; framing treats them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindCategory {
    /// Observed traffic.
    Event,
    /// Replace something in a paused flow.
    Mutation,
    /// Change how flows are selected for interception.
    InterceptControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MessageKind {
    Request = 1,
    RequestBody = 2,
    Response = 3,
    ResponseBody = 4,
    ChangeRequest = 11,
    ChangeInterceptUri = 21,
}

impl MessageKind {
    /// Every registered kind, in tag order.
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Request,
        MessageKind::RequestBody,
        MessageKind::Response,
        MessageKind::ResponseBody,
        MessageKind::ChangeRequest,
        MessageKind::ChangeInterceptUri,
    ];

    /// Wire tag.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether `tag` names a registered kind.
    pub fn is_valid(tag: u8) -> bool {
        Self::from_tag(tag).is_some()
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(MessageKind::Request),
            2 => Some(MessageKind::RequestBody),
            3 => Some(MessageKind::Response),
            4 => Some(MessageKind::ResponseBody),
            11 => Some(MessageKind::ChangeRequest),
            21 => Some(MessageKind::ChangeInterceptUri),
            _ => None,
        }
    }

    pub fn category(self) -> KindCategory {
        match self {
            MessageKind::Request
            | MessageKind::RequestBody
            | MessageKind::Response
            | MessageKind::ResponseBody => KindCategory::Event,
            MessageKind::ChangeRequest => KindCategory::Mutation,
            MessageKind::ChangeInterceptUri => KindCategory::InterceptControl,
        }
    }

    /// snake_case name, same as the serde/config form.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::RequestBody => "request_body",
            MessageKind::Response => "response",
            MessageKind::ResponseBody => "response_body",
            MessageKind::ChangeRequest => "change_request",
            MessageKind::ChangeInterceptUri => "change_intercept_uri",
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = FrameError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_tag(tag).ok_or(FrameError::UnknownKind(tag))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
