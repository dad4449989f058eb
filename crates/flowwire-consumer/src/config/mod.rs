//! Consumer config loader (strict parsing).

pub mod schema;

use std::fs;

use flowwire_core::error::{FlowWireError, Result};

pub use schema::{ConsumerConfig, ConsumerSection};

pub fn load_from_file(path: &str) -> Result<ConsumerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FlowWireError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ConsumerConfig> {
    let cfg: ConsumerConfig = serde_yaml::from_str(s)
        .map_err(|e| FlowWireError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
