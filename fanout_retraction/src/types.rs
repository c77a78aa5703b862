use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fanout_models::{
    posts::types::Post,
    profiles::types::DbAccount,
};

#[derive(Serialize)]
struct DeletionEvent {
    event: &'static str,
    payload: String,
}

/// Encoded "post deleted" event.
/// Created once per post and shared by all streaming channels.
#[derive(Clone, Debug, PartialEq)]
pub struct RetractionUnit(String);

impl RetractionUnit {
    pub fn deletion_event(post_id: Uuid) -> Self {
        let event = DeletionEvent {
            event: "delete",
            payload: post_id.to_string(),
        };
        let event_json = serde_json::to_string(&event)
            .expect("event should be serializable");
        Self(event_json)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a post taken before it is deleted
#[derive(Clone, Debug)]
pub struct RemovedPost {
    pub post: Post,
    pub mentions: Vec<DbAccount>,
    pub tags: Vec<String>,
    pub retraction: RetractionUnit,
}

/// Stream entries of a single local author
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StreamEntryBatch {
    pub stream_entry_ids: Vec<i64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FederationBatchEntry {
    pub payload: String,
    pub sender_id: Uuid,
    // Represents all mentioned accounts on the recipient's server
    pub recipient_id: Uuid,
}

#[derive(Debug, Default, PartialEq)]
pub struct RetractionReport {
    pub working_set_size: usize,
    pub deleted_count: u64,
    pub unpush_calls: usize,
    pub unpush_failures: usize,
    pub publish_calls: usize,
    pub publish_failures: usize,
    pub stream_entry_batches: usize,
    pub federation_entries: usize,
}
