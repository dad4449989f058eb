//! flowwire replay
//!
//! Feeds captured frames through the consumer pipeline:
//! - config path from argv (default `flowwire.yaml`)
//! - one hex-encoded frame per stdin line (`#` comments, blank lines skipped)
//! - per-flow summary logged as each flow completes, open flows at the end

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use flowwire_consumer::config;
use flowwire_consumer::dispatch::Dispatcher;
use flowwire_consumer::handlers::{FlowIndex, TraceHandler};
use flowwire_consumer::pipeline::{Outcome, Pipeline};
use flowwire_core::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "flowwire.yaml".into());
    let cfg = config::load_from_file(&path)?;

    let index = Arc::new(
        FlowIndex::new(cfg.consumer.reject_unknown_flows)
            .evict_completed(cfg.consumer.evict_completed),
    );
    let dispatcher = Arc::new(Dispatcher::new());
    dispatcher.register(Arc::new(TraceHandler));
    dispatcher.register(index.clone());

    let pipeline = Pipeline::new(&cfg.consumer, dispatcher);
    tracing::info!(config = %path, kinds = ?pipeline.dispatcher().registered_kinds(), "flowwire-replay starting");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (mut ok, mut failed) = (0usize, 0usize);
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| flowwire_core::FlowWireError::Internal(format!("read stdin: {e}")))?
    {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let raw = match hex::decode(line) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "not a hex frame, skipped");
                failed += 1;
                continue;
            }
        };

        match pipeline.process(Bytes::from(raw)).await {
            Ok(Outcome::Dispatched(_)) => ok += 1,
            Ok(Outcome::Dropped(_)) => {}
            Ok(Outcome::Rejected { .. }) => failed += 1,
            Err(e) => {
                tracing::warn!(line = line_no, code = e.client_code().as_str(), error = %e, "frame failed");
                failed += 1;
            }
        }
    }

    // Evicted flows were already logged; what is left is still open.
    for (id, rec) in index.snapshot() {
        rec.log_summary(id);
    }
    if let Some(uri) = index.intercept_uri() {
        tracing::info!(%uri, "intercept uri");
    }
    tracing::info!(ok, failed, completed = index.completed(), open = index.len(), "replay finished");
    Ok(())
}
