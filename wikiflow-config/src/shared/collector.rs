use serde::{Deserialize, Serialize};

use crate::shared::{PipelineConfig, ValidationError};

/// Configuration for the collector binary.
///
/// The collector acts as the external host of a pipeline: it starts the
/// pipeline and drains staged records on its own schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CollectorConfig {
    /// The pipeline run by this collector.
    pub pipeline: PipelineConfig,
    /// How often, in seconds, the collector drains staged records.
    #[serde(default = "default_drain_interval_secs")]
    pub drain_interval_secs: u64,
}

impl CollectorConfig {
    /// Default delay between drains, in seconds.
    pub const DEFAULT_DRAIN_INTERVAL_SECS: u64 = 5;

    /// Validates collector configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pipeline.validate()?;

        if self.drain_interval_secs == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "drain_interval_secs".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

fn default_drain_interval_secs() -> u64 {
    CollectorConfig::DEFAULT_DRAIN_INTERVAL_SECS
}
