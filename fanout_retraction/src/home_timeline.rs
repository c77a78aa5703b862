use uuid::Uuid;

use fanout_models::profiles::types::DbAccount;

use crate::collaborators::{Storage, TimelineCache, TimelineKind};
use crate::errors::ServiceError;
use crate::types::{RemovedPost, RetractionReport, StreamEntryBatch};

/// Returns accounts whose home timelines could contain posts of the author
pub async fn get_home_timeline_audience(
    storage: &dyn Storage,
    author: &DbAccount,
) -> Result<Vec<Uuid>, ServiceError> {
    let mut recipients: Vec<Uuid> = storage
        .list_local_followers(author).await?
        .into_iter()
        .map(|follower| follower.id)
        .collect();
    if author.is_local() {
        recipients.push(author.id);
    };
    Ok(recipients)
}

/// Removes posts of a single author from home timelines.
/// Cache errors are logged and counted.
pub async fn unpush_from_home_timelines(
    storage: &dyn Storage,
    timelines: &dyn TimelineCache,
    author: &DbAccount,
    posts: &[&RemovedPost],
    report: &mut RetractionReport,
) -> Result<(), ServiceError> {
    let recipients = get_home_timeline_audience(storage, author).await?;
    for recipient_id in recipients {
        for removed in posts {
            debug_assert_eq!(removed.post.author.id, author.id);
            report.unpush_calls += 1;
            if let Err(error) = timelines.unpush(
                TimelineKind::Home,
                recipient_id,
                &removed.post,
            ).await {
                report.unpush_failures += 1;
                log::warn!(
                    "failed to remove post {} from timeline of {}: {}",
                    removed.post.id,
                    recipient_id,
                    error,
                );
            };
        };
    };
    Ok(())
}

pub fn batch_stream_entries(
    posts: &[&RemovedPost],
    batch_size: usize,
) -> Vec<StreamEntryBatch> {
    let stream_entry_ids: Vec<i64> = posts.iter()
        .filter_map(|removed| removed.post.stream_entry.as_ref())
        .map(|stream_entry| stream_entry.id)
        .collect();
    stream_entry_ids
        .chunks(batch_size.max(1))
        .map(|chunk| StreamEntryBatch { stream_entry_ids: chunk.to_vec() })
        .collect()
}
