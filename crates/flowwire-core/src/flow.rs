//! Flow-source interface.
//!
//! The interception engine owns flows; this crate only reads them. A flow
//! exposes its id, request and response metadata (serialized as JSON into
//! `Request`/`Response` frames), the raw request body, and a decoded response
//! body accessor.

use std::collections::BTreeMap;
use std::io::Read;

use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Header name -> values, in the shape the UI expects.
pub type HeaderMap = BTreeMap<String, Vec<String>>;

/// A flow as seen by the event adapters.
pub trait Flow {
    type Request: Serialize;
    type Response: Serialize;

    /// Stable correlation id shared by every message of this flow.
    fn id(&self) -> Uuid;

    fn request(&self) -> &Self::Request;

    /// Raw request body as captured.
    fn request_body(&self) -> Bytes;

    fn response(&self) -> &Self::Response;

    /// Response body with content encoding reversed. Failing is allowed.
    fn decoded_response_body(&self) -> Result<Bytes, BodyDecodeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyDecodeError {
    #[error("unsupported content encoding: {0}")]
    UnsupportedEncoding(String),
    #[error("corrupt {encoding} body: {reason}")]
    Corrupt { encoding: String, reason: String },
}

/// Request metadata. Also the payload of a `ChangeRequest` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub proto: String,
    #[serde(default)]
    pub header: HeaderMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub status_code: u16,
    #[serde(default)]
    pub header: HeaderMap,
}

/// Case-insensitive first value lookup.
pub fn header_value<'a>(header: &'a HeaderMap, name: &str) -> Option<&'a str> {
    header
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.first())
        .map(String::as_str)
}

/// A fully captured flow held in memory.
#[derive(Debug, Clone)]
pub struct CapturedFlow {
    pub id: Uuid,
    pub request: RequestMeta,
    pub request_body: Bytes,
    pub response: ResponseMeta,
    pub response_body: Bytes,
}

impl Flow for CapturedFlow {
    type Request = RequestMeta;
    type Response = ResponseMeta;

    fn id(&self) -> Uuid {
        self.id
    }

    fn request(&self) -> &RequestMeta {
        &self.request
    }

    fn request_body(&self) -> Bytes {
        self.request_body.clone()
    }

    fn response(&self) -> &ResponseMeta {
        &self.response
    }

    /// Reverses `Content-Encoding`, last applied first. Supports gzip,
    /// deflate (zlib-wrapped or raw), br and identity.
    fn decoded_response_body(&self) -> Result<Bytes, BodyDecodeError> {
        let Some(header) = header_value(&self.response.header, "content-encoding") else {
            return Ok(self.response_body.clone());
        };

        let mut body = self.response_body.clone();
        for enc in header.rsplit(',').map(str::trim).filter(|e| !e.is_empty()) {
            body = decode_content(enc, &body)?;
        }
        Ok(body)
    }
}

fn decode_content(encoding: &str, body: &Bytes) -> Result<Bytes, BodyDecodeError> {
    let enc = encoding.to_ascii_lowercase();
    let corrupt = |e: std::io::Error| BodyDecodeError::Corrupt {
        encoding: enc.clone(),
        reason: e.to_string(),
    };

    let mut out = Vec::new();
    match enc.as_str() {
        "identity" => return Ok(body.clone()),
        "gzip" | "x-gzip" => {
            GzDecoder::new(&body[..]).read_to_end(&mut out).map_err(corrupt)?;
        }
        "deflate" => {
            // Servers disagree on whether "deflate" carries the zlib wrapper.
            if ZlibDecoder::new(&body[..]).read_to_end(&mut out).is_err() {
                out.clear();
                DeflateDecoder::new(&body[..]).read_to_end(&mut out).map_err(corrupt)?;
            }
        }
        "br" => {
            brotli::Decompressor::new(&body[..], 4096)
                .read_to_end(&mut out)
                .map_err(corrupt)?;
        }
        _ => return Err(BodyDecodeError::UnsupportedEncoding(encoding.to_string())),
    }
    Ok(Bytes::from(out))
}
