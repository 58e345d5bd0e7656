//! Core data types shared across the capture pipeline.

mod change;
mod record;

pub use change::{Change, FeedResponse, QueryPayload};
pub use record::{CHANGE_SCHEMA_VERSION, ChangePayload, SourceRecord};
