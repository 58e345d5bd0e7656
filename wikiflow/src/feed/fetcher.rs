use chrono::{DateTime, Utc};
use tracing::debug;
use wikiflow_config::shared::FeedConfig;

use crate::concurrency::staging::StagingBuffer;
use crate::error::FlowResult;
use crate::feed::client::FeedClient;

/// Executes paginated fetch cycles against the feed and owns the cursor.
///
/// A [`FeedFetcher`] is bound to one starting cursor at construction and
/// advances it after every successfully fetched page. The cursor is
/// monotonically non-decreasing for the lifetime of the fetcher: it always
/// equals the timestamp of the most recently buffered change, or its start
/// value when nothing was fetched yet.
#[derive(Debug)]
pub struct FeedFetcher<C> {
    client: C,
    buffer: StagingBuffer,
    cursor: DateTime<Utc>,
    page_size: u32,
    max_fetches_per_cycle: u32,
}

impl<C> FeedFetcher<C>
where
    C: FeedClient,
{
    /// Creates a fetcher starting from `cursor`.
    pub fn new(client: C, buffer: StagingBuffer, cursor: DateTime<Utc>, config: &FeedConfig) -> Self {
        Self {
            client,
            buffer,
            cursor,
            page_size: config.page_size,
            max_fetches_per_cycle: config.max_fetches_per_cycle,
        }
    }

    /// Returns the current cursor.
    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }

    /// Performs one fetch cycle and returns how many changes were buffered.
    ///
    /// A cycle issues up to the configured maximum of sequential paginated
    /// calls. After each call, every returned change is appended to the
    /// staging buffer and the cursor advances to the timestamp of the page's
    /// last change. A page shorter than the configured page size means the
    /// cycle has caught up to the live edge of the feed and stops early; the
    /// call cap bounds the worst-case cycle duration during a backlog.
    ///
    /// Any failure aborts the remainder of the cycle without retrying, keeping
    /// the cursor progress made by prior pages. The next cycle naturally
    /// retries from there.
    pub async fn fetch_cycle(&mut self) -> FlowResult<usize> {
        let mut buffered = 0;

        for fetches in 1..=self.max_fetches_per_cycle {
            let changes = self.client.fetch_page(self.cursor, self.page_size).await?;
            let page_len = changes.len();

            if let Some(last) = changes.last() {
                self.cursor = last.timestamp;
            }
            self.buffer.extend(changes).await;
            buffered += page_len;

            debug!(
                fetches,
                page_len,
                cursor = %self.cursor,
                "buffered a page of changes"
            );

            if page_len < self.page_size as usize {
                break;
            }
        }

        Ok(buffered)
    }
}
