use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};
use wikiflow_config::shared::PipelineConfig;

use crate::bail;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::concurrency::staging::StagingBuffer;
use crate::conversions::record::RecordBuilder;
use crate::error::{ErrorKind, FlowResult};
use crate::feed::client::FeedClient;
use crate::feed::fetcher::FeedFetcher;
use crate::state::offset::{OffsetStore, resolve_starting_cursor};
use crate::types::SourceRecord;
use crate::workers::fetch::{FetchWorker, FetchWorkerHandle};

/// Unique identifier of a pipeline, used for isolation in logs and checkpoints.
pub type PipelineId = u64;

#[derive(Debug)]
enum PipelineState {
    NotStarted,
    Started { fetch_worker: FetchWorkerHandle },
}

/// Change-capture pipeline for the recent-changes feed.
///
/// A [`Pipeline`] owns the background fetch worker and the staging buffer, and
/// exposes the drain path the external host calls on its own schedule. The
/// lifecycle is `NotStarted -> Started -> (shut down)`; a stopped pipeline is
/// consumed by [`Pipeline::wait`], and a restart constructs an entirely new
/// pipeline whose only carried state is the persisted checkpoint.
#[derive(Debug)]
pub struct Pipeline<S, C> {
    id: PipelineId,
    config: Arc<PipelineConfig>,
    offset_store: S,
    client: C,
    buffer: StagingBuffer,
    record_builder: RecordBuilder,
    state: PipelineState,
    shutdown_tx: ShutdownTx,
}

impl<S, C> Pipeline<S, C>
where
    S: OffsetStore + Send + Sync + 'static,
    C: FeedClient + Clone + Send + Sync + 'static,
{
    /// Creates a pipeline in the [`PipelineState::NotStarted`] state.
    ///
    /// The pipeline id is taken from the configuration.
    pub fn new(config: PipelineConfig, offset_store: S, client: C) -> Self {
        // Watch channel used purely to broadcast the shutdown request; workers
        // subscribe via the transmitter.
        let (shutdown_tx, _) = create_shutdown_channel();

        let record_builder = RecordBuilder::new(config.topic.clone());

        Self {
            id: config.id,
            config: Arc::new(config),
            offset_store,
            client,
            buffer: StagingBuffer::new(),
            record_builder,
            state: PipelineState::NotStarted,
            shutdown_tx,
        }
    }

    /// Returns the id of this pipeline.
    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Returns a transmitter that can shut down this pipeline.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Starts the pipeline.
    ///
    /// Validates the configuration (fatal on failure), resolves the starting
    /// cursor from the checkpoint store, and spawns the fetch worker on its
    /// fixed-delay schedule. The first fetch cycle begins immediately.
    pub async fn start(&mut self) -> FlowResult<()> {
        if let PipelineState::Started { .. } = self.state {
            bail!(ErrorKind::InvalidState, "pipeline was already started");
        }

        info!(
            id = self.id,
            topic = %self.config.topic,
            "starting capture pipeline"
        );

        if let Err(err) = self.config.validate() {
            bail!(
                ErrorKind::ConfigError,
                "invalid pipeline configuration",
                err.to_string(),
                source: err
            );
        }

        let cursor = resolve_starting_cursor(&self.offset_store, Utc::now()).await;
        info!(id = self.id, %cursor, "resolved starting cursor");

        let fetcher = FeedFetcher::new(
            self.client.clone(),
            self.buffer.clone(),
            cursor,
            &self.config.feed,
        );

        let fetch_worker = FetchWorker::new(
            self.id,
            fetcher,
            Duration::from_secs(self.config.poll_interval_secs),
            self.shutdown_tx.subscribe(),
        )
        .start();

        self.state = PipelineState::Started { fetch_worker };

        Ok(())
    }

    /// Drains all currently staged changes into source records.
    ///
    /// Invoked by the external host on its own schedule, concurrently with
    /// fetch cycles. Never fails: failures in the fetch path stay in the fetch
    /// path, and a poll simply returns whatever was staged, possibly nothing.
    pub async fn poll(&self) -> Vec<SourceRecord> {
        let changes = self.buffer.drain_all().await;

        changes
            .into_iter()
            .map(|change| self.record_builder.build(change))
            .collect()
    }

    /// Signals the pipeline to shut down without waiting for it.
    ///
    /// In-flight fetch work is abandoned, not drained: undelivered staged
    /// changes are lost, which is safe because the persisted checkpoint never
    /// advanced past them.
    pub fn shutdown(&self) {
        info!(id = self.id, "trying to shut down the pipeline");

        if let Err(err) = self.shutdown_tx.shutdown() {
            error!(id = self.id, "failed to send shutdown signal to the pipeline: {}", err);
            return;
        }

        info!(id = self.id, "shutdown signal successfully sent to the fetch worker");
    }

    /// Waits for the fetch worker to complete.
    pub async fn wait(self) -> FlowResult<()> {
        let PipelineState::Started { fetch_worker } = self.state else {
            info!(id = self.id, "pipeline was not started, nothing to wait for");

            return Ok(());
        };

        info!(id = self.id, "waiting for the fetch worker to complete");

        fetch_worker.wait().await
    }

    /// Shuts the pipeline down and waits for the fetch worker to finish.
    pub async fn shutdown_and_wait(self) -> FlowResult<()> {
        self.shutdown();
        self.wait().await
    }
}
