use crate::state::offset::offset_for;
use crate::types::{CHANGE_SCHEMA_VERSION, Change, ChangePayload, SourceRecord};

/// Builds source records from drained changes.
///
/// Construction is pure: no I/O, no shared state beyond the configured target
/// topic. Every produced record embeds the offset the downstream transport
/// persists once the record is durably accepted.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    topic: String,
}

impl RecordBuilder {
    /// Creates a builder addressing records to `topic`.
    pub fn new(topic: String) -> Self {
        Self { topic }
    }

    /// Converts one change into a source record.
    pub fn build(&self, change: Change) -> SourceRecord {
        let offset = offset_for(&change);
        let timestamp_ms = change.timestamp.timestamp_millis();

        SourceRecord {
            topic: self.topic.clone(),
            partition: None,
            schema_version: CHANGE_SCHEMA_VERSION,
            payload: ChangePayload {
                kind: change.kind,
                title: change.title,
                user: change.user,
                userid: change.user_id,
                timestamp: change.timestamp,
            },
            offset,
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::feed::change_at;

    #[test]
    fn record_carries_all_payload_fields_and_metadata() {
        let builder = RecordBuilder::new("wikipedia".to_string());
        let mut change = change_at("Some Page", "2024-01-01T00:00:05Z");
        change.user = Some("ExampleUser".to_string());
        change.user_id = Some(42);

        let record = builder.build(change.clone());

        assert_eq!(record.topic, "wikipedia");
        assert_eq!(record.partition, None);
        assert_eq!(record.schema_version, CHANGE_SCHEMA_VERSION);
        assert_eq!(record.payload.kind, "edit");
        assert_eq!(record.payload.title, "Some Page");
        assert_eq!(record.payload.user.as_deref(), Some("ExampleUser"));
        assert_eq!(record.payload.userid, Some(42));
        assert_eq!(record.payload.timestamp, change.timestamp);
        assert_eq!(record.offset.timestamp, 1_704_067_205_000);
        assert_eq!(record.timestamp_ms, 1_704_067_205_000);
    }

    #[test]
    fn absent_user_fields_serialize_as_null() {
        let builder = RecordBuilder::new("wikipedia".to_string());
        let record = builder.build(change_at("Anonymous Edit", "2024-01-01T00:00:00Z"));

        let value = serde_json::to_value(&record.payload).unwrap();

        assert!(value["user"].is_null());
        assert!(value["userid"].is_null());
        assert_eq!(value["type"], "edit");
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00Z");
    }
}
