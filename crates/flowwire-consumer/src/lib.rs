//! flowwire consumer library entry.
//!
//! Wires config, frame policy, the per-kind dispatcher, and built-in handlers
//! into a pipeline that turns inbound frames into handled messages. Used by
//! the replay binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod pipeline;
pub mod policy;
