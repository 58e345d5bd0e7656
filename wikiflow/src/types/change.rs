use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One reported change from the recent-changes feed.
///
/// A [`Change`] is immutable once constructed: the timestamp is parsed into an
/// absolute instant during deserialization, so downstream code never deals with
/// the feed's string representation.
///
/// cf. <https://www.mediawiki.org/wiki/API:RecentChanges>
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Change {
    /// Kind of change reported by the feed, e.g. "new" or "edit".
    ///
    /// The set is open-ended upstream, so this stays a plain string.
    #[serde(rename = "type")]
    pub kind: String,
    /// Title of the changed page.
    pub title: String,
    /// Name of the user that made the change, when reported.
    #[serde(default)]
    pub user: Option<String>,
    /// Numeric id of the user that made the change, when reported.
    #[serde(default, rename = "userid")]
    pub user_id: Option<i32>,
    /// Instant at which the change happened, at the feed's resolution.
    pub timestamp: DateTime<Utc>,
}

/// Envelope of a recent-changes API response.
///
/// Only the fields the pipeline consumes are modeled; everything else in the
/// response is ignored.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub query: QueryPayload,
}

/// The `query` object nested inside a recent-changes API response.
#[derive(Debug, Deserialize)]
pub struct QueryPayload {
    #[serde(rename = "recentchanges")]
    pub recent_changes: Vec<Change>,
}
