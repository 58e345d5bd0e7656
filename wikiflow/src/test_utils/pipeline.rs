use wikiflow_config::shared::{FeedConfig, PipelineConfig};

use crate::pipeline::{Pipeline, PipelineId};
use crate::state::memory::MemoryOffsetStore;
use crate::test_utils::feed::MockFeedClient;

/// Returns a valid pipeline configuration for tests.
pub fn test_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        id: 1,
        topic: "wikipedia".to_string(),
        poll_interval_secs: 30,
        feed: FeedConfig::default(),
    }
}

/// Creates a pipeline wired to a scripted feed client and an in-memory
/// offset store, returning handles to both doubles.
///
/// The given `id` overrides whatever id the configuration carries.
pub fn create_pipeline(
    id: PipelineId,
    mut config: PipelineConfig,
) -> (
    Pipeline<MemoryOffsetStore, MockFeedClient>,
    MockFeedClient,
    MemoryOffsetStore,
) {
    config.id = id;

    let client = MockFeedClient::new();
    let store = MemoryOffsetStore::new();

    let pipeline = Pipeline::new(config, store.clone(), client.clone());

    (pipeline, client, store)
}
