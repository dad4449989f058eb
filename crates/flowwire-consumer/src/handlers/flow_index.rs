//! Per-flow view assembled from event and command messages.
//!
//! Messages of one flow share a correlation id and arrive in event order
//! (`Request`, `RequestBody`, `Response`, `ResponseBody`); the index keeps the
//! latest state of each flow keyed by that id.
//!
//! With eviction on, a flow leaves the index once its `ResponseBody` arrives;
//! its summary is logged at that point. Callers that keep eviction off own
//! cleanup through [`FlowIndex::take`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use flowwire_core::error::{FlowWireError, Result};
use flowwire_core::flow::{RequestMeta, ResponseMeta};
use flowwire_core::protocol::Command;
use flowwire_core::{Message, MessageKind};

use crate::dispatch::MessageHandler;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowRecord {
    pub request: Option<RequestMeta>,
    pub request_body_len: Option<usize>,
    pub response: Option<ResponseMeta>,
    /// `Some(0)` means absent or undecodable; the wire does not distinguish.
    pub response_body_len: Option<usize>,
    /// Wait flag of the most recent event for this flow.
    pub waiting: bool,
    /// A `ChangeRequest` replaced the request.
    pub edited: bool,
}

impl FlowRecord {
    pub fn log_summary(&self, id: Uuid) {
        let (method, url) = self
            .request
            .as_ref()
            .map(|r| (r.method.as_str(), r.url.as_str()))
            .unwrap_or(("-", "-"));
        tracing::info!(
            %id,
            method,
            url,
            status = self.response.as_ref().map(|r| r.status_code),
            request_body = self.request_body_len,
            response_body = self.response_body_len,
            waiting = self.waiting,
            edited = self.edited,
            "flow"
        );
    }
}

pub struct FlowIndex {
    flows: DashMap<Uuid, FlowRecord>,
    intercept_uri: Mutex<Option<String>>,
    reject_unknown_flows: bool,
    evict_completed: bool,
    completed: AtomicU64,
}

impl FlowIndex {
    pub fn new(reject_unknown_flows: bool) -> Self {
        Self {
            flows: DashMap::new(),
            intercept_uri: Mutex::new(None),
            reject_unknown_flows,
            evict_completed: false,
            completed: AtomicU64::new(0),
        }
    }

    /// Drop a flow from the index once its `ResponseBody` has been handled.
    pub fn evict_completed(mut self, on: bool) -> Self {
        self.evict_completed = on;
        self
    }

    /// Remove a flow and hand back its record.
    pub fn take(&self, id: &Uuid) -> Option<FlowRecord> {
        self.flows.remove(id).map(|(_, rec)| rec)
    }

    /// Flows evicted after completion so far.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn get(&self, id: &Uuid) -> Option<FlowRecord> {
        self.flows.get(id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Snapshot of every flow, ordered by id for stable output.
    pub fn snapshot(&self) -> Vec<(Uuid, FlowRecord)> {
        let mut out: Vec<(Uuid, FlowRecord)> = self
            .flows
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    pub fn intercept_uri(&self) -> Option<String> {
        self.intercept_uri
            .lock()
            .map(|g| (*g).clone())
            .unwrap_or_else(|poisoned| (*poisoned.into_inner()).clone())
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut FlowRecord)) -> Result<()> {
        match self.flows.entry(id) {
            Entry::Occupied(mut e) => f(e.get_mut()),
            Entry::Vacant(e) => {
                if self.reject_unknown_flows {
                    return Err(FlowWireError::BadRequest(format!("unknown flow: {id}")));
                }
                let mut rec = FlowRecord::default();
                f(&mut rec);
                e.insert(rec);
            }
        }
        Ok(())
    }

    fn apply_command(&self, cmd: Command) -> Result<()> {
        match cmd {
            Command::ChangeRequest { id, request } => self.update(id, |rec| {
                rec.request = Some(request);
                rec.edited = true;
            }),
            Command::ChangeInterceptUri(uri) => {
                let mut g = self
                    .intercept_uri
                    .lock()
                    .map_err(|_| FlowWireError::Internal("intercept_uri lock poisoned".into()))?;
                *g = Some(uri);
                Ok(())
            }
        }
    }
}

fn parse_meta<T: DeserializeOwned>(msg: &Message) -> Result<T> {
    serde_json::from_slice(msg.payload())
        .map_err(|e| FlowWireError::InvalidPayload(format!("{}: {e}", msg.kind())))
}

#[async_trait]
impl MessageHandler for FlowIndex {
    fn name(&self) -> &'static str {
        "flow_index"
    }

    fn kinds(&self) -> &'static [MessageKind] {
        &MessageKind::ALL
    }

    async fn handle(&self, msg: &Message) -> Result<()> {
        let id = msg.id();
        let waiting = msg.is_waiting();
        match msg.kind() {
            MessageKind::Request => {
                // A request opens a flow, so it is never "unknown".
                let meta: RequestMeta = parse_meta(msg)?;
                let mut rec = self.flows.entry(id).or_default();
                rec.request = Some(meta);
                rec.waiting = waiting;
                Ok(())
            }
            MessageKind::RequestBody => {
                let len = msg.payload().len();
                self.update(id, |rec| {
                    rec.request_body_len = Some(len);
                    rec.waiting = waiting;
                })
            }
            MessageKind::Response => {
                let meta: ResponseMeta = parse_meta(msg)?;
                self.update(id, |rec| {
                    rec.response = Some(meta);
                    rec.waiting = waiting;
                })
            }
            MessageKind::ResponseBody => {
                let len = msg.payload().len();
                self.update(id, |rec| {
                    rec.response_body_len = Some(len);
                    rec.waiting = waiting;
                })?;
                if self.evict_completed {
                    if let Some(rec) = self.take(&id) {
                        self.completed.fetch_add(1, Ordering::Relaxed);
                        rec.log_summary(id);
                    }
                }
                Ok(())
            }
            MessageKind::ChangeRequest | MessageKind::ChangeInterceptUri => {
                self.apply_command(Command::decode(msg)?)
            }
        }
    }
}
