#![cfg(feature = "test-utils")]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::time::timeout;
use wikiflow::error::ErrorKind;
use wikiflow::pipeline::Pipeline;
use wikiflow::state::memory::MemoryOffsetStore;
use wikiflow::state::offset::OffsetPayload;
use wikiflow::test_utils::feed::{MockFeedClient, change_at};
use wikiflow::test_utils::pipeline::{create_pipeline, test_pipeline_config};
use wikiflow::types::SourceRecord;
use wikiflow_telemetry::tracing::init_test_tracing;

/// Polls the pipeline until at least `count` records were produced.
async fn poll_records(
    pipeline: &Pipeline<MemoryOffsetStore, MockFeedClient>,
    count: usize,
) -> Vec<SourceRecord> {
    let collect = async {
        let mut records = Vec::new();
        while records.len() < count {
            records.extend(pipeline.poll().await);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        records
    };

    timeout(Duration::from_secs(5), collect)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {count} records"))
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_delivers_staged_changes_through_poll() {
    init_test_tracing();

    let (mut pipeline, client, _) = create_pipeline(rand::random(), test_pipeline_config());
    let mut edit = change_at("Rust (programming language)", "2024-01-01T00:00:05Z");
    edit.user = Some("ExampleUser".to_string());
    edit.user_id = Some(42);
    client
        .push_page(vec![
            edit,
            change_at("New Article", "2024-01-01T00:00:09Z"),
        ])
        .await;

    pipeline.start().await.unwrap();

    let records = poll_records(&pipeline, 2).await;
    pipeline.shutdown_and_wait().await.unwrap();

    // A single short page satisfies the cycle.
    assert_eq!(client.requests().await.len(), 1);

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.topic, "wikipedia");
    assert_eq!(first.partition, None);
    assert_eq!(first.payload.kind, "edit");
    assert_eq!(first.payload.title, "Rust (programming language)");
    assert_eq!(first.payload.user.as_deref(), Some("ExampleUser"));
    assert_eq!(first.payload.userid, Some(42));
    assert_eq!(first.offset.timestamp, 1_704_067_205_000);
    assert_eq!(first.timestamp_ms, 1_704_067_205_000);

    let second = &records[1];
    assert_eq!(second.payload.title, "New Article");
    assert_eq!(second.payload.user, None);
    assert_eq!(second.payload.userid, None);
    assert_eq!(second.offset.timestamp, 1_704_067_209_000);
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_resumes_from_the_persisted_checkpoint() {
    init_test_tracing();

    // 1704067200000 = 2024-01-01T00:00:00Z.
    let store = MemoryOffsetStore::with_offset(OffsetPayload {
        timestamp: 1_704_067_200_000,
    });
    let client = MockFeedClient::new();
    let mut config = test_pipeline_config();
    config.id = rand::random();
    let mut pipeline = Pipeline::new(config, store, client.clone());

    pipeline.start().await.unwrap();

    let first_request = timeout(Duration::from_secs(5), async {
        loop {
            if let Some(request) = client.requests().await.first().copied() {
                return request;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    pipeline.shutdown_and_wait().await.unwrap();

    assert_eq!(
        first_request.cursor,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(first_request.limit, 100);
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_with_invalid_topic_fails_to_start() {
    init_test_tracing();

    let mut config = test_pipeline_config();
    config.topic = String::new();
    let (mut pipeline, client, _) = create_pipeline(rand::random(), config);

    let err = pipeline.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigError);
    // Startup never reached the feed.
    assert!(client.requests().await.is_empty());
    pipeline.shutdown_and_wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_with_too_small_poll_interval_fails_to_start() {
    init_test_tracing();

    let mut config = test_pipeline_config();
    config.poll_interval_secs = 5;
    let (mut pipeline, client, _) = create_pipeline(rand::random(), config);

    let err = pipeline.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigError);
    assert!(client.requests().await.is_empty());
    pipeline.shutdown_and_wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_cannot_be_started_twice() {
    init_test_tracing();

    let id = rand::random();
    let (mut pipeline, _, _) = create_pipeline(id, test_pipeline_config());
    assert_eq!(pipeline.id(), id);

    pipeline.start().await.unwrap();
    let err = pipeline.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
    pipeline.shutdown_and_wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn poll_drains_each_change_exactly_once() {
    init_test_tracing();

    let (mut pipeline, client, _) = create_pipeline(rand::random(), test_pipeline_config());
    client
        .push_page(vec![change_at("Only Once", "2024-01-01T00:00:01Z")])
        .await;

    pipeline.start().await.unwrap();

    let records = poll_records(&pipeline, 1).await;
    assert_eq!(records.len(), 1);

    // Nothing new was staged, so subsequent polls come back empty.
    assert!(pipeline.poll().await.is_empty());
    assert!(pipeline.poll().await.is_empty());

    pipeline.shutdown_and_wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_stops_the_fetch_worker() {
    init_test_tracing();

    let (mut pipeline, client, _) = create_pipeline(rand::random(), test_pipeline_config());

    pipeline.start().await.unwrap();

    timeout(Duration::from_secs(5), async {
        while client.requests().await.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    pipeline.shutdown_and_wait().await.unwrap();

    let requests_after_shutdown = client.requests().await.len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(client.requests().await.len(), requests_after_shutdown);
}
