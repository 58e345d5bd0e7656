use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::FlowResult;
use crate::state::offset::{OffsetPayload, OffsetStore};

/// In-memory offset store for testing and development purposes.
///
/// [`MemoryOffsetStore`] holds the checkpoint in memory, making it ideal for
/// tests and for running the pipeline without a real checkpoint store behind
/// it. The stored offset is lost when the process terminates.
#[derive(Debug, Clone, Default)]
pub struct MemoryOffsetStore {
    inner: Arc<Mutex<Option<OffsetPayload>>>,
}

impl MemoryOffsetStore {
    /// Creates a new store holding no checkpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a persisted checkpoint.
    pub fn with_offset(offset: OffsetPayload) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(offset))),
        }
    }

    /// Replaces the stored checkpoint.
    ///
    /// In production the downstream transport performs this write; exposing it
    /// here lets tests simulate delivered records.
    pub async fn set_offset(&self, offset: OffsetPayload) {
        let mut stored = self.inner.lock().await;
        *stored = Some(offset);
    }
}

impl OffsetStore for MemoryOffsetStore {
    async fn load_offset(&self) -> FlowResult<Option<OffsetPayload>> {
        let stored = self.inner.lock().await;
        Ok(*stored)
    }
}
