use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::error::{FlowError, FlowResult};
use crate::feed::client::FeedClient;
use crate::types::Change;

/// One call observed by the [`MockFeedClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedRequest {
    pub cursor: DateTime<Utc>,
    pub limit: u32,
}

#[derive(Debug, Default)]
struct Inner {
    script: VecDeque<FlowResult<Vec<Change>>>,
    requests: Vec<RecordedRequest>,
}

/// Scripted in-memory feed client.
///
/// Responses are served in the order they were pushed; once the script runs
/// out, every call returns an empty page, which reads as a caught-up feed.
/// Every call is recorded with the cursor and limit it was made with.
#[derive(Debug, Clone, Default)]
pub struct MockFeedClient {
    inner: Arc<Mutex<Inner>>,
}

impl MockFeedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful page of changes.
    pub async fn push_page(&self, changes: Vec<Change>) {
        self.inner.lock().await.script.push_back(Ok(changes));
    }

    /// Scripts a failed call.
    pub async fn push_error(&self, error: FlowError) {
        self.inner.lock().await.script.push_back(Err(error));
    }

    /// Returns every call made so far, in order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }
}

impl FeedClient for MockFeedClient {
    async fn fetch_page(&self, cursor: DateTime<Utc>, limit: u32) -> FlowResult<Vec<Change>> {
        let mut inner = self.inner.lock().await;
        inner.requests.push(RecordedRequest { cursor, limit });

        match inner.script.pop_front() {
            Some(result) => result,
            None => Ok(vec![]),
        }
    }
}

/// Builds an edit to `title` at the given RFC 3339 timestamp, with no user
/// attribution.
pub fn change_at(title: &str, timestamp: &str) -> Change {
    Change {
        kind: "edit".to_string(),
        title: title.to_string(),
        user: None,
        user_id: None,
        timestamp: DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Utc),
    }
}

/// Builds a full page of `n` changes with strictly increasing timestamps.
///
/// Consecutive `page` values for the same `start` produce one continuous,
/// strictly increasing sequence, so scripted pagination looks like a real
/// backlog.
pub fn full_page(n: usize, start: DateTime<Utc>, page: usize) -> Vec<Change> {
    (0..n)
        .map(|i| {
            let offset = (page * n + i + 1) as i64;
            let mut change = change_at("Backlog Page", "2024-01-01T00:00:00Z");
            change.title = format!("Backlog Page {}", page * n + i);
            change.timestamp = start + TimeDelta::seconds(offset);
            change
        })
        .collect()
}
