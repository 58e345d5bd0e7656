use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::offset::OffsetPayload;

/// Version of the change payload schema carried by every [`SourceRecord`].
pub const CHANGE_SCHEMA_VERSION: u16 = 1;

/// Body of a source record, schema version 1.
///
/// Field names and optionality are part of the versioned output contract:
/// `{ type: string, title: string, user: string|null, userid: int32|null,
/// timestamp: instant }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub user: Option<String>,
    pub userid: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// A record ready to hand off to the downstream transport.
///
/// Carries the payload plus the out-of-band delivery metadata: the target
/// topic, the offset the transport persists once the record is durably
/// accepted, and the record timestamp. No partition key is assigned; the only
/// ordering guarantee is feed-arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRecord {
    /// Topic the record is addressed to.
    pub topic: String,
    /// Always `None`: changes are unordered with respect to any key.
    pub partition: Option<i32>,
    /// Version of the payload schema.
    pub schema_version: u16,
    /// The change itself.
    pub payload: ChangePayload,
    /// Checkpoint the transport persists when it durably accepts this record.
    pub offset: OffsetPayload,
    /// Record timestamp in epoch milliseconds, taken from the change.
    pub timestamp_ms: i64,
}
