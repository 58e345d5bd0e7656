use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, error, info, warn};
use wikiflow::feed::client::WikipediaFeedClient;
use wikiflow::pipeline::Pipeline;
use wikiflow::state::memory::MemoryOffsetStore;
use wikiflow_config::load_config;
use wikiflow_config::shared::CollectorConfig;

/// Loads the collector configuration and runs a pipeline until Ctrl+C.
///
/// The collector plays the role of the external host: it starts the pipeline,
/// drains staged records on its own fixed schedule, and emits each record to
/// stdout as a JSON line. The offset store is in-memory, so a restarted
/// collector begins from the default lookback window.
pub async fn start_collector() -> anyhow::Result<()> {
    let collector_config = load_config::<CollectorConfig>()?;
    collector_config.validate()?;

    let client = WikipediaFeedClient::new(&collector_config.pipeline.feed);
    let offset_store = MemoryOffsetStore::new();

    let mut pipeline = Pipeline::new(collector_config.pipeline.clone(), offset_store, client);

    pipeline.start().await?;

    // Listen for Ctrl+C and broadcast shutdown to the pipeline workers.
    let shutdown_tx = pipeline.shutdown_tx();
    let shutdown_handle = tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {err:?}");
            return;
        }

        info!("Ctrl+C received, shutting down the collector");
        if let Err(err) = shutdown_tx.shutdown() {
            warn!("failed to send shutdown signal: {err:?}");
        }
    });

    drain_until_shutdown(&pipeline, collector_config.drain_interval_secs).await;

    let result = pipeline.wait().await;

    // The shutdown task may still be waiting for Ctrl+C if the pipeline ended
    // on its own; it has nothing left to do either way.
    shutdown_handle.abort();
    let _ = shutdown_handle.await;

    result?;

    Ok(())
}

/// Drains staged records on a fixed schedule until shutdown is requested.
async fn drain_until_shutdown<S, C>(pipeline: &Pipeline<S, C>, drain_interval_secs: u64)
where
    S: wikiflow::state::offset::OffsetStore + Send + Sync + 'static,
    C: wikiflow::feed::client::FeedClient + Clone + Send + Sync + 'static,
{
    let mut shutdown_rx = pipeline.shutdown_tx().subscribe();
    let mut drain = interval(Duration::from_secs(drain_interval_secs));

    loop {
        tokio::select! {
            _ = drain.tick() => {
                let records = pipeline.poll().await;
                debug!(drained = records.len(), "drained staged records");

                for record in records {
                    match serde_json::to_string(&record) {
                        Ok(line) => println!("{line}"),
                        Err(err) => error!("failed to serialize a record: {err}"),
                    }
                }
            }
            _ = shutdown_rx.signaled() => {
                info!("shutdown requested, stopping the drain loop");
                return;
            }
        }
    }
}
