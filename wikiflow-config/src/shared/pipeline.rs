use serde::{Deserialize, Serialize};

use crate::shared::{FeedConfig, ValidationError};

/// Configuration for a change-capture pipeline.
///
/// Contains all settings required to run a capture pipeline: the identity of
/// the target stream, the fetch schedule, and the upstream feed parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// The unique identifier for this pipeline.
    ///
    /// A pipeline id determines isolation between pipelines in logs and in
    /// the checkpoint store.
    pub id: u64,
    /// Topic the produced records are addressed to.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Fixed delay, in seconds, between the end of one fetch cycle and the
    /// start of the next.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Upstream feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
}

impl PipelineConfig {
    /// Default topic that records are addressed to.
    pub const DEFAULT_TOPIC: &'static str = "wikipedia";

    /// Default delay between fetch cycles, in seconds.
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

    /// Minimum supported delay between fetch cycles, in seconds.
    pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

    /// Validates pipeline configuration settings.
    ///
    /// Checks the topic, the poll interval, and the nested feed settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }

        if self.poll_interval_secs < Self::MIN_POLL_INTERVAL_SECS {
            return Err(ValidationError::PollIntervalTooSmall {
                actual: self.poll_interval_secs,
                minimum: Self::MIN_POLL_INTERVAL_SECS,
            });
        }

        self.feed.validate()?;

        Ok(())
    }
}

fn default_topic() -> String {
    PipelineConfig::DEFAULT_TOPIC.to_string()
}

fn default_poll_interval_secs() -> u64 {
    PipelineConfig::DEFAULT_POLL_INTERVAL_SECS
}
