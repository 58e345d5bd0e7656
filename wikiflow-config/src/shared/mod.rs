//! Shared configuration types for wikiflow pipelines.

mod collector;
mod feed;
mod pipeline;

use thiserror::Error;

pub use collector::CollectorConfig;
pub use feed::FeedConfig;
pub use pipeline::PipelineConfig;

/// Errors returned when validating configuration values.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The target topic must be a non-empty string.
    #[error("the target topic must not be empty")]
    EmptyTopic,

    /// The poll interval is below the supported minimum.
    #[error("poll interval of {actual}s is below the minimum of {minimum}s")]
    PollIntervalTooSmall { actual: u64, minimum: u64 },

    /// A field has a value outside its supported range.
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}
