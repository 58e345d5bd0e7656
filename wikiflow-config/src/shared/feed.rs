use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Configuration for the upstream recent-changes feed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedConfig {
    /// Base URL of the MediaWiki API endpoint to poll.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Number of changes requested per API call.
    ///
    /// The API documents a ceiling of 500, but values above ~100 periodically
    /// result in errors, so the default stays at 100.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Maximum number of paginated calls in a single fetch cycle.
    ///
    /// Bounds the worst-case cycle duration when the pipeline is catching up
    /// on a backlog, so a single cycle cannot starve the fetch schedule.
    #[serde(default = "default_max_fetches_per_cycle")]
    pub max_fetches_per_cycle: u32,
}

impl FeedConfig {
    /// Default MediaWiki API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://en.wikipedia.org/w/api.php";

    /// Default number of changes requested per API call.
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Hard ceiling documented by the API for a single call.
    pub const MAX_PAGE_SIZE: u32 = 500;

    /// Default maximum number of calls per fetch cycle.
    pub const DEFAULT_MAX_FETCHES_PER_CYCLE: u32 = 80;

    /// Validates feed configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "feed.endpoint".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        if self.page_size == 0 || self.page_size > Self::MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidFieldValue {
                field: "feed.page_size".to_string(),
                constraint: format!("must be between 1 and {}", Self::MAX_PAGE_SIZE),
            });
        }

        if self.max_fetches_per_cycle == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "feed.max_fetches_per_cycle".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            max_fetches_per_cycle: default_max_fetches_per_cycle(),
        }
    }
}

fn default_endpoint() -> String {
    FeedConfig::DEFAULT_ENDPOINT.to_string()
}

fn default_page_size() -> u32 {
    FeedConfig::DEFAULT_PAGE_SIZE
}

fn default_max_fetches_per_cycle() -> u32 {
    FeedConfig::DEFAULT_MAX_FETCHES_PER_CYCLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_feed_config_is_valid() {
        assert!(FeedConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let config = FeedConfig {
            endpoint: String::new(),
            ..FeedConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFieldValue { field, .. }) if field == "feed.endpoint"
        ));
    }

    #[test]
    fn page_size_outside_bounds_is_rejected() {
        let zero = FeedConfig {
            page_size: 0,
            ..FeedConfig::default()
        };
        let over_ceiling = FeedConfig {
            page_size: FeedConfig::MAX_PAGE_SIZE + 1,
            ..FeedConfig::default()
        };

        for config in [zero, over_ceiling] {
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidFieldValue { field, .. }) if field == "feed.page_size"
            ));
        }
    }

    #[test]
    fn zero_fetch_cap_is_rejected() {
        let config = FeedConfig {
            max_fetches_per_cycle: 0,
            ..FeedConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFieldValue { field, .. })
                if field == "feed.max_fetches_per_cycle"
        ));
    }
}
