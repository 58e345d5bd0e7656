//! Background worker that runs fetch cycles on a fixed-delay schedule.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::concurrency::shutdown::ShutdownRx;
use crate::error::{ErrorKind, FlowResult};
use crate::feed::client::FeedClient;
use crate::feed::fetcher::FeedFetcher;
use crate::flow_error;
use crate::pipeline::PipelineId;

/// Handle to a running fetch worker.
#[derive(Debug)]
pub struct FetchWorkerHandle {
    join_handle: JoinHandle<FlowResult<()>>,
}

impl FetchWorkerHandle {
    /// Waits for the fetch worker to complete.
    ///
    /// Returns `Ok(())` once the worker observed the shutdown signal, or an
    /// error if the worker task panicked.
    pub async fn wait(self) -> FlowResult<()> {
        match self.join_handle.await {
            Ok(result) => result,
            Err(err) => Err(flow_error!(
                ErrorKind::FetchWorkerPanic,
                "fetch worker task panicked",
                err
            )),
        }
    }
}

/// Worker that drives the feed fetcher on a fixed-delay schedule.
///
/// Cycles are strictly serialized: the delay runs from the end of one cycle to
/// the start of the next, so a slow cycle never triggers back-to-back cycles.
/// The first cycle starts immediately. A failed cycle is logged and retried on
/// the next scheduled run; nothing in the fetch path is fatal to the worker.
pub struct FetchWorker<C> {
    pipeline_id: PipelineId,
    fetcher: FeedFetcher<C>,
    poll_interval: Duration,
    shutdown_rx: ShutdownRx,
}

impl<C> FetchWorker<C>
where
    C: FeedClient + Send + Sync + 'static,
{
    /// Creates a new fetch worker around an already-positioned fetcher.
    pub fn new(
        pipeline_id: PipelineId,
        fetcher: FeedFetcher<C>,
        poll_interval: Duration,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            pipeline_id,
            fetcher,
            poll_interval,
            shutdown_rx,
        }
    }

    /// Starts the worker in a background task and returns its handle.
    pub fn start(self) -> FetchWorkerHandle {
        FetchWorkerHandle {
            join_handle: tokio::spawn(self.run()),
        }
    }

    /// Main worker loop alternating fetch cycles with fixed delays.
    async fn run(mut self) -> FlowResult<()> {
        info!(
            pipeline_id = self.pipeline_id,
            interval_secs = self.poll_interval.as_secs(),
            cursor = %self.fetcher.cursor(),
            "starting fetch worker"
        );

        loop {
            if self.shutdown_rx.is_shutdown() {
                info!(pipeline_id = self.pipeline_id, "fetch worker shutting down");
                return Ok(());
            }

            tokio::select! {
                result = self.fetcher.fetch_cycle() => match result {
                    Ok(buffered) => {
                        debug!(
                            pipeline_id = self.pipeline_id,
                            buffered,
                            cursor = %self.fetcher.cursor(),
                            "fetch cycle complete"
                        );
                    }
                    Err(error) => {
                        // Partial cursor progress from the failed cycle is kept;
                        // the next cycle retries from there.
                        warn!(
                            pipeline_id = self.pipeline_id,
                            %error,
                            cursor = %self.fetcher.cursor(),
                            "fetch cycle aborted, retrying on the next cycle"
                        );
                    }
                },
                _ = self.shutdown_rx.signaled() => {
                    info!(
                        pipeline_id = self.pipeline_id,
                        "fetch worker shutting down, abandoning in-flight cycle"
                    );
                    return Ok(());
                }
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => {}
                _ = self.shutdown_rx.signaled() => {
                    info!(pipeline_id = self.pipeline_id, "fetch worker shutting down");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::shutdown::create_shutdown_channel;
    use crate::concurrency::staging::StagingBuffer;
    use crate::test_utils::feed::{MockFeedClient, change_at};
    use chrono::{TimeZone, Utc};
    use wikiflow_config::shared::FeedConfig;

    #[tokio::test(start_paused = true)]
    async fn worker_runs_cycles_with_a_fixed_delay_and_shuts_down() {
        let client = MockFeedClient::new();
        client
            .push_page(vec![change_at("A", "2024-01-01T00:00:00Z")])
            .await;
        client
            .push_page(vec![change_at("B", "2024-01-01T00:00:30Z")])
            .await;

        let buffer = StagingBuffer::new();
        let fetcher = FeedFetcher::new(
            client.clone(),
            buffer.clone(),
            Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap(),
            &FeedConfig::default(),
        );

        let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let handle =
            FetchWorker::new(1, fetcher, Duration::from_secs(30), shutdown_rx).start();

        // First cycle runs immediately; the second only after the fixed delay.
        // Under paused time the delays advance automatically once every task
        // is idle, so both scripted pages end up staged.
        while buffer.len().await < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown_tx.shutdown().unwrap();
        handle.wait().await.unwrap();

        assert!(client.requests().await.len() >= 2);
    }

    #[tokio::test]
    async fn worker_stops_promptly_when_shut_down_mid_sleep() {
        let client = MockFeedClient::new();

        let buffer = StagingBuffer::new();
        let fetcher = FeedFetcher::new(
            client.clone(),
            buffer,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            &FeedConfig::default(),
        );

        let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let handle =
            FetchWorker::new(1, fetcher, Duration::from_secs(3600), shutdown_rx).start();

        // Let the first cycle finish, then signal shutdown during the long sleep.
        while client.requests().await.is_empty() {
            tokio::task::yield_now().await;
        }
        shutdown_tx.shutdown().unwrap();

        handle.wait().await.unwrap();
        assert_eq!(client.requests().await.len(), 1);
    }
}
