//! Staging buffer between the fetch worker and the drain path.

use std::mem;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::Change;

/// Ordered holding area for changes awaiting hand-off.
///
/// The fetch worker is the only writer; the drain path is the only reader.
/// A drain atomically returns everything currently staged and leaves the
/// buffer empty, so an append racing a drain lands either entirely before or
/// entirely after it, never split. There is no capacity bound beyond the
/// per-cycle fetch cap; draining often enough is the caller's responsibility.
///
/// Cloning is cheap and all clones share the same underlying buffer.
#[derive(Debug, Clone)]
pub struct StagingBuffer {
    inner: Arc<Mutex<Vec<Change>>>,
}

impl StagingBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Appends a single change at the end of the buffer.
    pub async fn append(&self, change: Change) {
        let mut staged = self.inner.lock().await;
        staged.push(change);
    }

    /// Appends a page of changes at the end of the buffer, preserving order.
    pub async fn extend(&self, changes: Vec<Change>) {
        let mut staged = self.inner.lock().await;
        staged.extend(changes);
    }

    /// Atomically takes the full current contents and clears the buffer.
    pub async fn drain_all(&self) -> Vec<Change> {
        let mut staged = self.inner.lock().await;
        mem::take(&mut *staged)
    }

    /// Returns the number of currently staged changes.
    pub async fn len(&self) -> usize {
        let staged = self.inner.lock().await;
        staged.len()
    }

    /// Returns whether the buffer is currently empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::feed::change_at;

    #[tokio::test]
    async fn drain_returns_staged_changes_in_order() {
        let buffer = StagingBuffer::new();
        buffer.append(change_at("A", "2024-01-01T00:00:00Z")).await;
        buffer.append(change_at("B", "2024-01-01T00:00:05Z")).await;

        let drained = buffer.drain_all().await;

        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "A");
        assert_eq!(drained[1].title, "B");
    }

    #[tokio::test]
    async fn second_drain_without_appends_is_empty() {
        let buffer = StagingBuffer::new();
        buffer.append(change_at("A", "2024-01-01T00:00:00Z")).await;

        assert_eq!(buffer.drain_all().await.len(), 1);
        assert!(buffer.drain_all().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_appends_and_drains_lose_nothing() {
        let buffer = StagingBuffer::new();
        let total = 1000;

        let producer = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                for i in 0..total {
                    buffer
                        .append(change_at(&format!("page-{i}"), "2024-01-01T00:00:00Z"))
                        .await;

                    if i % 64 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        };

        let consumer = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                let mut collected = Vec::new();
                while collected.len() < total {
                    collected.extend(buffer.drain_all().await);
                    tokio::task::yield_now().await;
                }
                collected
            })
        };

        producer.await.unwrap();
        let collected = consumer.await.unwrap();

        // Every appended change shows up exactly once, in append order.
        assert_eq!(collected.len(), total);
        for (i, change) in collected.iter().enumerate() {
            assert_eq!(change.title, format!("page-{i}"));
        }
    }
}
