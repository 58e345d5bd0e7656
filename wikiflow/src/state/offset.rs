//! Offset payloads and starting-cursor resolution.
//!
//! The pipeline has exactly one logical partition, so a checkpoint is a single
//! epoch-millisecond timestamp. This layer only ever reads the checkpoint
//! store; writes happen downstream, when the transport durably accepts a
//! record carrying the offset payload produced here.

use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::FlowResult;
use crate::types::Change;

/// Persisted checkpoint payload for the pipeline's single logical partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPayload {
    /// Timestamp of the last durably handed-off change, in epoch milliseconds.
    pub timestamp: i64,
}

impl OffsetPayload {
    /// Converts the persisted value back into a resumption cursor.
    ///
    /// Returns [`None`] when the stored value is outside the representable
    /// range, which can only happen with a corrupted checkpoint.
    pub fn cursor(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Produces the offset persisted for a change once it is handed off.
///
/// Embedded per-record into every source record, so the transport can
/// checkpoint each record the moment it is durably accepted, independent of
/// staging-buffer boundaries.
pub fn offset_for(change: &Change) -> OffsetPayload {
    OffsetPayload {
        timestamp: change.timestamp.timestamp_millis(),
    }
}

/// Trait for reading the persisted checkpoint at pipeline start.
///
/// Implementations define where the checkpoint lives. The pipeline consults
/// the store exactly once, during startup; it never writes it.
pub trait OffsetStore {
    /// Returns the last persisted offset, or [`None`] when no checkpoint
    /// exists yet.
    fn load_offset(&self) -> impl Future<Output = FlowResult<Option<OffsetPayload>>> + Send;
}

/// Resolves the cursor the next fetch cycle should resume from.
///
/// A persisted checkpoint is used verbatim. When none exists, or the store
/// cannot be read, the cursor defaults to `now` truncated to whole seconds
/// minus 24 hours: a deliberate bounded backfill window instead of full
/// history. Store failures are logged and never fatal.
pub async fn resolve_starting_cursor<S>(store: &S, now: DateTime<Utc>) -> DateTime<Utc>
where
    S: OffsetStore,
{
    // Bounded backfill window: now truncated to whole seconds, minus 24 hours.
    let default_cursor =
        DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now) - TimeDelta::days(1);

    match store.load_offset().await {
        Ok(Some(offset)) => match offset.cursor() {
            Some(cursor) => {
                info!(%cursor, "resuming from persisted offset");
                cursor
            }
            None => {
                warn!(
                    timestamp = offset.timestamp,
                    "persisted offset is out of range, falling back to default cursor"
                );
                default_cursor
            }
        },
        Ok(None) => {
            debug!("no persisted offset, starting from default cursor");
            default_cursor
        }
        Err(error) => {
            warn!(%error, "failed to read the offset store, starting from default cursor");
            default_cursor
        }
    }
}
