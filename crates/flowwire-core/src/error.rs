//! Shared error types across flowwire crates.

use thiserror::Error;

/// Stable error codes reported to peers and asserted by test vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Frame shorter than the fixed header.
    TooShort,
    /// Frame or config carries an unsupported version.
    UnsupportedVersion,
    /// Kind tag outside the registry.
    UnknownKind,
    /// Correlation id region is not a canonical identifier.
    MalformedCorrelationId,
    /// Payload does not match what its kind requires.
    InvalidPayload,
    /// Invalid input (config, policy, misuse).
    BadRequest,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::TooShort => "TOO_SHORT",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::UnknownKind => "UNKNOWN_KIND",
            ErrorCode::MalformedCorrelationId => "MALFORMED_CORRELATION_ID",
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Decode failures for a single frame. None of them is retryable for the
/// same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame too short: {len} bytes, header needs 39")]
    TooShort { len: usize },
    #[error("unsupported frame version: {0}")]
    UnsupportedVersion(u8),
    #[error("unknown message kind: {0}")]
    UnknownKind(u8),
    #[error("malformed correlation id")]
    MalformedCorrelationId,
}

impl FrameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FrameError::TooShort { .. } => ErrorCode::TooShort,
            FrameError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            FrameError::UnknownKind(_) => ErrorCode::UnknownKind,
            FrameError::MalformedCorrelationId => ErrorCode::MalformedCorrelationId,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FlowWireError>;

/// Unified error type used by core and consumer.
#[derive(Debug, Error)]
pub enum FlowWireError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("message kind {actual:?} is not a {expected}")]
    KindMismatch {
        expected: &'static str,
        actual: crate::protocol::MessageKind,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl FlowWireError {
    /// Map to a stable code.
    pub fn client_code(&self) -> ErrorCode {
        match self {
            FlowWireError::Frame(e) => e.code(),
            FlowWireError::InvalidPayload(_) => ErrorCode::InvalidPayload,
            FlowWireError::KindMismatch { .. } => ErrorCode::BadRequest,
            FlowWireError::BadRequest(_) => ErrorCode::BadRequest,
            FlowWireError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            FlowWireError::Internal(_) => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_keep_their_code_when_wrapped() {
        let e: FlowWireError = FrameError::UnknownKind(9).into();
        assert_eq!(e.client_code(), ErrorCode::UnknownKind);
        assert_eq!(e.to_string(), "unknown message kind: 9");
    }
}
