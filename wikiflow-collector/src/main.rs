//! Wikipedia change collector binary.
//!
//! Runs a capture pipeline against the live recent-changes feed and writes
//! each drained record to stdout as one JSON line. Shuts down gracefully on
//! Ctrl+C.

use tracing::error;
use wikiflow_telemetry::tracing::init_tracing;

use crate::core::start_collector;

mod core;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(err) = start_collector().await {
        error!("collector terminated with an error: {err:#}");
        return Err(err);
    }

    Ok(())
}
