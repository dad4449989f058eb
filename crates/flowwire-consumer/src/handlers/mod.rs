//! Built-in message handlers.

pub mod flow_index;
pub mod trace;

pub use flow_index::{FlowIndex, FlowRecord};
pub use trace::TraceHandler;
