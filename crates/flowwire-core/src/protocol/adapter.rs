//! Event adapters: project a flow into correctly tagged messages.
//!
//! Every adapter leaves the wait flag cleared. A sender that is holding the
//! flow for an interception decision sets it afterwards.

use bytes::Bytes;
use serde::Serialize;

use super::{Message, MessageKind};
use crate::flow::{BodyDecodeError, Flow};

/// JSON-encode flow metadata.
///
/// Metadata types are serializable by contract with the flow source; a failure
/// here is a broken invariant upstream, not bad input, so it aborts the caller.
#[allow(clippy::panic)]
fn encode_metadata<T: Serialize + ?Sized>(kind: MessageKind, value: &T) -> Bytes {
    match serde_json::to_vec(value) {
        Ok(v) => Bytes::from(v),
        Err(e) => panic!("{kind} metadata is not serializable: {e}"),
    }
}

impl Message {
    /// `Request` message carrying the request metadata as JSON.
    pub fn from_request_metadata<F: Flow + ?Sized>(flow: &F) -> Self {
        let payload = encode_metadata(MessageKind::Request, flow.request());
        Message::new(MessageKind::Request, flow.id(), payload)
    }

    /// `RequestBody` message carrying the raw request body, untouched.
    pub fn from_request_body<F: Flow + ?Sized>(flow: &F) -> Self {
        Message::new(MessageKind::RequestBody, flow.id(), flow.request_body())
    }

    /// `Response` message carrying the response metadata as JSON.
    pub fn from_response_metadata<F: Flow + ?Sized>(flow: &F) -> Self {
        let payload = encode_metadata(MessageKind::Response, flow.response());
        Message::new(MessageKind::Response, flow.id(), payload)
    }

    /// `ResponseBody` message carrying the decoded response body.
    ///
    /// Best effort: when decoding fails the payload is empty, so on the wire
    /// an empty body means "absent or undecodable". Use
    /// [`Message::try_from_response_body`] to tell the two apart locally.
    pub fn from_response_body<F: Flow + ?Sized>(flow: &F) -> Self {
        Self::try_from_response_body(flow).unwrap_or_else(|e| {
            tracing::warn!(id = %flow.id(), error = %e, "response body not decodable, sending empty body");
            Message::new(MessageKind::ResponseBody, flow.id(), Bytes::new())
        })
    }

    /// Like [`Message::from_response_body`] but surfaces the decode failure.
    pub fn try_from_response_body<F: Flow + ?Sized>(flow: &F) -> Result<Self, BodyDecodeError> {
        let body = flow.decoded_response_body()?;
        Ok(Message::new(MessageKind::ResponseBody, flow.id(), body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flow::{CapturedFlow, HeaderMap, RequestMeta, ResponseMeta};
    use crate::protocol::{decode_frame, encode_frame};
    use uuid::Uuid;

    fn sample_flow() -> CapturedFlow {
        let mut header = HeaderMap::new();
        header.insert("Accept".into(), vec!["*/*".into()]);
        CapturedFlow {
            id: Uuid::parse_str("9b2e1c4a-0f3d-4e5a-8b7c-6d5e4f3a2b1c").unwrap(),
            request: RequestMeta {
                method: "POST".into(),
                url: "https://api.example.com/v1/items?x=1".into(),
                proto: "HTTP/1.1".into(),
                header,
            },
            request_body: Bytes::from_static(b"{\"name\":\"widget\"}"),
            response: ResponseMeta {
                status_code: 201,
                header: HeaderMap::new(),
            },
            response_body: Bytes::from_static(b"created"),
        }
    }

    #[test]
    fn request_metadata_is_json() {
        let flow = sample_flow();
        let msg = Message::from_request_metadata(&flow);

        assert_eq!(msg.kind(), MessageKind::Request);
        assert_eq!(msg.id(), flow.id);
        assert_eq!(msg.wait_intercept(), 0);

        let back: RequestMeta = serde_json::from_slice(msg.payload()).unwrap();
        assert_eq!(back, flow.request);
    }

    #[test]
    fn response_metadata_is_json() {
        let flow = sample_flow();
        let msg = Message::from_response_metadata(&flow);
        assert_eq!(msg.kind(), MessageKind::Response);

        let json: serde_json::Value = serde_json::from_slice(msg.payload()).unwrap();
        assert_eq!(json["statusCode"], 201);
    }

    #[test]
    fn request_body_is_passed_through() {
        let flow = sample_flow();
        let msg = Message::from_request_body(&flow);
        assert_eq!(msg.kind(), MessageKind::RequestBody);
        assert_eq!(msg.payload(), &flow.request_body);
    }

    #[test]
    fn empty_request_body_is_not_an_error() {
        let mut flow = sample_flow();
        flow.request_body = Bytes::new();
        let msg = Message::from_request_body(&flow);
        assert_eq!(msg.kind(), MessageKind::RequestBody);
        assert!(msg.payload().is_empty());
    }

    #[test]
    fn undecodable_response_body_becomes_empty() {
        let mut flow = sample_flow();
        flow.response
            .header
            .insert("Content-Encoding".into(), vec!["gzip".into()]);

        assert!(Message::try_from_response_body(&flow).is_err());

        let msg = Message::from_response_body(&flow);
        assert_eq!(msg.kind(), MessageKind::ResponseBody);
        assert!(msg.payload().is_empty());
    }

    #[test]
    fn compressed_response_body_is_sent_decoded() {
        use std::io::Write;

        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"hello").unwrap();

        let mut flow = sample_flow();
        flow.response
            .header
            .insert("Content-Encoding".into(), vec!["gzip".into()]);
        flow.response_body = Bytes::from(enc.finish().unwrap());

        let msg = Message::from_response_body(&flow);
        assert_eq!(&msg.payload()[..], b"hello");
    }

    #[test]
    fn adapters_survive_the_wire() {
        let flow = sample_flow();
        let msgs = [
            Message::from_request_metadata(&flow),
            Message::from_request_body(&flow),
            Message::from_response_metadata(&flow),
            Message::from_response_body(&flow),
        ];
        for msg in msgs {
            assert_eq!(decode_frame(encode_frame(&msg)).unwrap(), msg);
        }
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    struct BrokenFlow;

    impl Flow for BrokenFlow {
        type Request = Unserializable;
        type Response = Unserializable;

        fn id(&self) -> Uuid {
            Uuid::nil()
        }
        fn request(&self) -> &Unserializable {
            &Unserializable
        }
        fn request_body(&self) -> Bytes {
            Bytes::new()
        }
        fn response(&self) -> &Unserializable {
            &Unserializable
        }
        fn decoded_response_body(&self) -> Result<Bytes, BodyDecodeError> {
            Err(BodyDecodeError::Corrupt {
                encoding: "gzip".into(),
                reason: "truncated".into(),
            })
        }
    }

    #[test]
    #[should_panic(expected = "request metadata is not serializable")]
    fn unserializable_metadata_is_fatal() {
        let _ = Message::from_request_metadata(&BrokenFlow);
    }

    #[test]
    fn corrupt_body_is_reported_by_try_variant() {
        let err = Message::try_from_response_body(&BrokenFlow).unwrap_err();
        assert_eq!(err.to_string(), "corrupt gzip body: truncated");
        assert!(Message::from_response_body(&BrokenFlow).payload().is_empty());
    }
}
